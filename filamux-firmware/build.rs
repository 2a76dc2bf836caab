//! Build script for filamux-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates mmu.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections the firmware reads
const SECTIONS: [&str; 6] = ["selector", "idler", "feed", "timing", "link", "pins"];

/// Number of filament slots
const SLOT_COUNT: usize = 5;

/// Highest RP2040 GPIO number
const MAX_GPIO: u32 = 29;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate mmu.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=mmu.toml");

    let config_path = Path::new("mmu.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: mmu.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds mmu.toml as its configuration.              ║\n\
            ║  Please create one in the filamux-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read mmu.toml                                  ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in mmu.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_required_sections(&config, &mut errors);
    validate_offsets(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_placement(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in mmu.toml                        ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=mmu.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Every section must be present, and must be a table
fn validate_required_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for name in SECTIONS {
        match config.get(name) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", name)),
            None => errors.push(format!("Missing [{}] section", name)),
        }
    }
}

/// Slot offset tables hold exactly one integer per slot
fn validate_offsets(config: &toml::Value, errors: &mut Vec<String>) {
    for name in ["selector", "idler"] {
        let Some(table) = section(config, name) else {
            continue;
        };

        match table.get("offsets") {
            Some(toml::Value::Array(values)) => {
                if values.len() != SLOT_COUNT {
                    errors.push(format!("[{}] offsets needs {} entries", name, SLOT_COUNT));
                }
                if values.iter().any(|v| !v.is_integer()) {
                    errors.push(format!("[{}] offsets must be integers", name));
                }
            }
            Some(_) => errors.push(format!("[{}] offsets must be an array", name)),
            None => {}
        }
    }
}

/// Timeouts and delays must be positive integers
fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = section(config, "timing") else {
        return;
    };

    for (key, value) in timing {
        match value {
            toml::Value::Integer(v) if *v > 0 => {}
            _ => errors.push(format!("[timing] {} must be a positive integer", key)),
        }
    }
}

fn validate_placement(config: &toml::Value, errors: &mut Vec<String>) {
    let placement = section(config, "feed").and_then(|f| f.get("sensor_placement"));

    match placement {
        Some(toml::Value::String(p)) if ["before_gear", "after_gear"].contains(&p.as_str()) => {}
        Some(_) => errors.push(
            "[feed] sensor_placement must be 'before_gear' or 'after_gear'".to_string(),
        ),
        None => {}
    }
}

/// Pins are "gpioNN" with optional '!' and '^' prefixes, used once each
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = section(config, "pins") else {
        return;
    };

    let mut used: Vec<(u32, &str)> = Vec::new();
    for (key, value) in pins {
        let Some(spec) = value.as_str() else {
            errors.push(format!("[pins] {} must be a string", key));
            continue;
        };

        let number = spec
            .trim_start_matches(['!', '^'])
            .strip_prefix("gpio")
            .and_then(|n| n.parse::<u32>().ok());

        match number {
            Some(n) if n > MAX_GPIO => errors.push(format!("[pins] {} gpio{} out of range", key, n)),
            Some(n) if [0, 1, 8, 9].contains(&n) => {
                errors.push(format!("[pins] {} uses UART pin gpio{}", key, n))
            }
            Some(n) => {
                if let Some((_, other)) = used.iter().find(|(pin, _)| *pin == n) {
                    errors.push(format!("[pins] {} and {} share gpio{}", other, key, n));
                }
                used.push((n, key));
            }
            None => errors.push(format!("[pins] {} has invalid pin '{}'", key, spec)),
        }
    }
}
