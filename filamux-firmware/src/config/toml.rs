//! Simple TOML parser for the unit configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `mmu.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Flat integer arrays: offsets = [0, 0, -3, 0, 0]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Inline tables
//! - Dotted keys

use filamux_core::config::{ExtruderSensorPlacement, MmuConfig, PinConfig};
use filamux_core::slot::SLOT_COUNT;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Array with the wrong number of items
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Selector,
    Idler,
    Feed,
    Timing,
    Link,
    Pins,
}

/// Parse TOML text on top of the stock configuration
///
/// Keys that are absent keep their default value; unknown keys are
/// ignored.
pub fn parse_config(input: &str) -> Result<MmuConfig, ParseError> {
    let mut config = MmuConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

/// Parse a section header like "selector" or "pins"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "selector" => Ok(Section::Selector),
        "idler" => Ok(Section::Idler),
        "feed" => Ok(Section::Feed),
        "timing" => Ok(Section::Timing),
        "link" => Ok(Section::Link),
        "pins" => Ok(Section::Pins),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse a key = value line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a one-per-slot integer array like "[0, 0, -3, 0, 0]"
fn parse_offsets(value: &str) -> Result<[i32; SLOT_COUNT], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut offsets = [0; SLOT_COUNT];
    let mut count = 0;
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slot = offsets.get_mut(count).ok_or(ParseError::TooManyItems)?;
        *slot = parse_int(item)?;
        count += 1;
    }

    if count != SLOT_COUNT {
        return Err(ParseError::TooManyItems);
    }
    Ok(offsets)
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value)?;
    let mut inverted = false;
    let mut pull_up = false;
    let mut s = value;

    // Check for modifiers
    while !s.is_empty() {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    // Parse "gpioNN"
    let num = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = num.parse().map_err(|_| ParseError::InvalidPin)?;
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

/// Parse the extruder switch placement
fn parse_placement(value: &str) -> Result<ExtruderSensorPlacement, ParseError> {
    match parse_string(value)? {
        "before_gear" => Ok(ExtruderSensorPlacement::BeforeGear),
        "after_gear" => Ok(ExtruderSensorPlacement::AfterGear),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply one key to the configuration
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MmuConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Selector => {
            let s = &mut config.selector;
            match key {
                "pitch" => s.pitch = parse_int(value)?,
                "offsets" => s.offsets = parse_offsets(value)?,
                "max_travel" => s.max_travel = parse_int(value)?,
                "right_force" => s.right_force = parse_int(value)?,
                "slot0_force" => s.slot0_force = parse_int(value)?,
                "resync_threshold" => s.resync_threshold = parse_int(value)?,
                "power_down_when_idle" => s.power_down_when_idle = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Idler => {
            let i = &mut config.idler;
            match key {
                "pitch" => i.pitch = parse_int(value)?,
                "offsets" => i.offsets = parse_offsets(value)?,
                "parked_position" => i.parked_position = parse_int(value)?,
                "quick_step" => i.quick_step = parse_int(value)?,
                _ => {}
            }
        }
        Section::Feed => {
            let f = &mut config.feed;
            match key {
                "steps_per_mm" => f.steps_per_mm = parse_int(value)?,
                "unload_back_mm" => f.unload_back_mm = parse_int(value)?,
                "mmu_to_extruder_mm" => f.mmu_to_extruder_mm = parse_int(value)?,
                "extruder_to_gear_mm" => f.extruder_to_gear_mm = parse_int(value)?,
                "sensor_placement" => f.sensor_placement = parse_placement(value)?,
                "load_duration_ms" => f.load_duration_ms = parse_int(value)?,
                "load_speed_mm_s" => f.load_speed_mm_s = parse_int(value)?,
                "instruction_delay_us" => f.instruction_delay_us = parse_int(value)?,
                _ => {}
            }
        }
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "selector_exit_timeout_ms" => t.selector_exit_timeout_ms = parse_int(value)?,
                "gear_load_timeout_ms" => t.gear_load_timeout_ms = parse_int(value)?,
                "extruder_release_timeout_ms" => {
                    t.extruder_release_timeout_ms = parse_int(value)?
                }
                "load_unload_timeout_ms" => t.load_unload_timeout_ms = parse_int(value)?,
                "finish_load_grace_ms" => t.finish_load_grace_ms = parse_int(value)?,
                "ack_delay_ms" => t.ack_delay_ms = parse_int(value)?,
                "recovery_pause_ms" => t.recovery_pause_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Link => {
            let l = &mut config.link;
            match key {
                "wait_s" => l.wait_s = parse_int(value)?,
                "fw_version" => l.fw_version = parse_int(value)?,
                "build_number" => l.build_number = parse_int(value)?,
                "diagnostics" => l.diagnostics = parse_bool(value)?,
                "console_ack" => l.console_ack = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Pins => {
            let p = &mut config.pins;
            match key {
                "selector_step" => p.selector.step = parse_pin(value)?,
                "selector_dir" => p.selector.dir = parse_pin(value)?,
                "selector_enable" => p.selector.enable = parse_pin(value)?,
                "idler_step" => p.idler.step = parse_pin(value)?,
                "idler_dir" => p.idler.dir = parse_pin(value)?,
                "idler_enable" => p.idler.enable = parse_pin(value)?,
                "feed_step" => p.feed.step = parse_pin(value)?,
                "feed_dir" => p.feed.dir = parse_pin(value)?,
                "feed_enable" => p.feed.enable = parse_pin(value)?,
                "selector_exit" => p.selector_exit = parse_pin(value)?,
                "extruder_entry" => p.extruder_entry = parse_pin(value)?,
                "selector_endstop" => p.selector_endstop = parse_pin(value)?,
                "led" => p.led = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}
