//! Machine configuration types
//!
//! Units: axis positions in full steps, feed lengths in millimetres
//! (converted with `steps_per_mm`), durations in milliseconds unless a
//! field name says otherwise.

use super::calibration::SlotTable;
use super::hardware::{AxisTiming, PinsConfig};
use crate::slot::SLOT_COUNT;

/// Where the extruder entry switch sits relative to the extruder drive gear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtruderSensorPlacement {
    /// Switch triggers before the filament reaches the gear; loads are
    /// gated on it
    BeforeGear,
    /// Switch sits behind the gear; loads run a fixed distance
    AfterGear,
}

/// Selector comb (lead screw) configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectorConfig {
    /// Distance between adjacent slots
    pub pitch: i32,
    /// Per-slot correction added to `pitch * slot`
    pub offsets: [i32; SLOT_COUNT],
    /// Full travel from the left hard stop to the endstop
    pub max_travel: i32,
    /// Extra travel pushed into the left stop when homing
    pub right_force: i32,
    /// Over-travel used when approaching slot 0
    pub slot0_force: i32,
    /// Tool changes allowed between forced resyncs
    pub resync_threshold: u32,
    /// Cut selector motor power while feeding into the extruder
    pub power_down_when_idle: bool,
    pub timing: AxisTiming,
}

impl SelectorConfig {
    /// Calibrated slot positions
    pub const fn table(&self) -> SlotTable {
        SlotTable::from_pitch(self.pitch, self.offsets)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            pitch: 357,
            offsets: [0; SLOT_COUNT],
            max_travel: 1890,
            right_force: 50,
            slot0_force: 100,
            resync_threshold: 20,
            power_down_when_idle: false,
            timing: AxisTiming::SELECTOR,
        }
    }
}

/// Idler roller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdlerConfig {
    /// Distance between adjacent slots
    pub pitch: i32,
    /// Per-slot correction added to `pitch * slot`
    pub offsets: [i32; SLOT_COUNT],
    /// Fully retracted position, also the homing travel
    pub parked_position: i32,
    /// Back-off used by the quick disengage
    pub quick_step: i32,
    pub timing: AxisTiming,
}

impl IdlerConfig {
    /// Calibrated slot positions
    pub const fn table(&self) -> SlotTable {
        SlotTable::from_pitch(self.pitch, self.offsets)
    }

    /// Back-off used by the partial disengage, rounded up
    pub const fn partial_step(&self) -> i32 {
        (self.quick_step + 1) / 2
    }
}

impl Default for IdlerConfig {
    fn default() -> Self {
        Self {
            pitch: 23,
            offsets: [0; SLOT_COUNT],
            parked_position: 125,
            quick_step: 23,
            timing: AxisTiming::IDLER,
        }
    }
}

/// Feed roller and filament path configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedConfig {
    /// Feed steps per millimetre of filament
    pub steps_per_mm: u32,
    /// Pull-back after a load or unload to clear the selector head
    pub unload_back_mm: u32,
    /// Fixed feed from the selector exit towards the extruder
    pub mmu_to_extruder_mm: u32,
    /// Additional feed from the extruder switch into the drive gear
    pub extruder_to_gear_mm: u32,
    pub sensor_placement: ExtruderSensorPlacement,
    /// Duration of the final push into the drive gear
    pub load_duration_ms: u32,
    /// Speed of the final push in mm/s
    pub load_speed_mm_s: u32,
    /// Loop overhead subtracted from the final push step delay
    pub instruction_delay_us: u32,
    pub timing: AxisTiming,
}

impl FeedConfig {
    /// Convert a length to feed steps
    pub const fn mm_to_steps(&self, mm: u32) -> u32 {
        mm * self.steps_per_mm
    }

    /// Step count of the final push
    pub const fn finish_load_steps(&self) -> u32 {
        self.steps_per_mm * self.load_duration_ms / 1000 * self.load_speed_mm_s
    }

    /// Per-step delay of the final push in microseconds
    pub const fn finish_load_step_delay_us(&self) -> u32 {
        let steps = self.finish_load_steps();
        if steps == 0 {
            return 0;
        }
        (self.load_duration_ms * 1000 / steps).saturating_sub(self.instruction_delay_us)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            steps_per_mm: 144,
            unload_back_mm: 10,
            mmu_to_extruder_mm: 500,
            extruder_to_gear_mm: 15,
            sensor_placement: ExtruderSensorPlacement::BeforeGear,
            load_duration_ms: 1000,
            load_speed_mm_s: 21,
            instruction_delay_us: 25,
            timing: AxisTiming::FEED,
        }
    }
}

/// Sequence deadlines and pauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Load from the slot to the selector exit sensor
    pub selector_exit_timeout_ms: u32,
    /// Re-acquire the selector exit sensor at the start of a gear load
    pub gear_load_timeout_ms: u32,
    /// Unload while the extruder switch still sees filament
    pub extruder_release_timeout_ms: u32,
    /// General load/unload deadline between the stages
    pub load_unload_timeout_ms: u32,
    /// Wait before checking the extruder switch after the final push
    pub finish_load_grace_ms: u32,
    /// Pause before acknowledging a load or unload
    pub ack_delay_ms: u32,
    /// Pause after a fault has been cleared
    pub recovery_pause_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            selector_exit_timeout_ms: 10_000,
            gear_load_timeout_ms: 2_000,
            extruder_release_timeout_ms: 2_000,
            load_unload_timeout_ms: 10_000,
            finish_load_grace_ms: 2_000,
            ack_delay_ms: 200,
            recovery_pause_ms: 1,
        }
    }
}

/// Printer link and console behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Seconds to wait for the printer after the boot announcement
    pub wait_s: u32,
    /// Reported by `S1`
    pub fw_version: u16,
    /// Reported by `S2`
    pub build_number: u16,
    /// Accept the exercise and soak test console commands
    pub diagnostics: bool,
    /// Block fault recovery until a key is pressed on the console
    pub console_ack: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            wait_s: 10,
            fw_version: 90,
            build_number: 85,
            diagnostics: false,
            console_ack: true,
        }
    }
}

/// Complete unit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmuConfig {
    pub selector: SelectorConfig,
    pub idler: IdlerConfig,
    pub feed: FeedConfig,
    pub timing: TimingConfig,
    pub link: LinkConfig,
    pub pins: PinsConfig,
}

impl MmuConfig {
    /// Create the stock configuration
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    #[test]
    fn test_default_tables_fit_travel() {
        let config = MmuConfig::default();
        assert!(config.selector.table().max() < config.selector.max_travel);
        let idler = config.idler.table();
        assert!(idler.max() + config.idler.quick_step <= config.idler.parked_position);
        assert_eq!(idler.position(Slot::ZERO), 0);
    }

    #[test]
    fn test_partial_step_rounds_up() {
        let mut idler = IdlerConfig::default();
        assert_eq!(idler.partial_step(), 12);
        idler.quick_step = 22;
        assert_eq!(idler.partial_step(), 11);
    }

    #[test]
    fn test_finish_load_profile() {
        let feed = FeedConfig::default();
        assert_eq!(feed.finish_load_steps(), 144 * 21);
        // 1_000_000 / 3024 = 330, minus loop overhead
        assert_eq!(feed.finish_load_step_delay_us(), 305);
    }

    #[test]
    fn test_finish_load_zero_steps() {
        let feed = FeedConfig {
            load_speed_mm_s: 0,
            ..FeedConfig::default()
        };
        assert_eq!(feed.finish_load_steps(), 0);
        assert_eq!(feed.finish_load_step_delay_us(), 0);
    }
}
