//! Hardware configuration types
//!
//! Pin assignments and step-timing for the three stepper axes, the
//! three digital inputs and the indicator LED.

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an inverted pin with pull-up enabled (switch to ground)
    pub const fn switch_to_ground(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// STEP/DIR/EN pins of one stepper driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisPins {
    pub step: PinConfig,
    pub dir: PinConfig,
    /// Driver enable, usually active-low
    pub enable: PinConfig,
}

impl AxisPins {
    /// Pins with the common active-low enable
    pub const fn new(step: u8, dir: u8, enable: u8) -> Self {
        Self {
            step: PinConfig::new(step),
            dir: PinConfig::new(dir),
            enable: PinConfig::inverted(enable),
        }
    }
}

/// All GPIO used by the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinsConfig {
    pub selector: AxisPins,
    pub idler: AxisPins,
    pub feed: AxisPins,
    /// Filament sensor at the selector exit
    pub selector_exit: PinConfig,
    /// Filament switch at the extruder entry
    pub extruder_entry: PinConfig,
    /// Selector endstop at the far end of travel
    pub selector_endstop: PinConfig,
    /// Indicator LED lit during the final load
    pub led: PinConfig,
}

impl Default for PinsConfig {
    fn default() -> Self {
        // SKR Pico style wiring: X/Y/Z driver sockets, endstop headers
        Self {
            selector: AxisPins::new(11, 10, 12),
            idler: AxisPins::new(6, 5, 7),
            feed: AxisPins::new(19, 28, 2),
            selector_exit: PinConfig::new(16),
            extruder_entry: PinConfig::new(25),
            selector_endstop: PinConfig::switch_to_ground(4),
            led: PinConfig::new(24),
        }
    }
}

/// Pulse timing of one axis
///
/// Values are empirically tuned per axis rather than derived from a
/// speed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisTiming {
    /// STEP high time in microseconds
    pub pulse_high_us: u32,
    /// STEP low time in microseconds
    pub pulse_low_us: u32,
    /// Extra delay between steps in microseconds
    pub step_delay_us: u32,
    /// Wait after setting direction before the first pulse
    pub settle_us: u32,
    /// Driver microsteps per logical step
    pub microsteps: u32,
}

impl AxisTiming {
    /// Selector lead screw
    pub const SELECTOR: Self = Self {
        pulse_high_us: 10,
        pulse_low_us: 10,
        step_delay_us: 60,
        settle_us: 1500,
        microsteps: 16,
    };

    /// Idler roller cam
    pub const IDLER: Self = Self {
        pulse_high_us: 10,
        pulse_low_us: 0,
        step_delay_us: 530,
        settle_us: 1000,
        microsteps: 16,
    };

    /// Feed pinch roller; logical steps are already microsteps
    pub const FEED: Self = Self {
        pulse_high_us: 10,
        pulse_low_us: 10,
        step_delay_us: 50,
        settle_us: 1000,
        microsteps: 1,
    };

    /// Time of one logical step in microseconds
    pub const fn step_period_us(&self) -> u32 {
        (self.pulse_high_us + self.pulse_low_us + self.step_delay_us) * self.microsteps
    }
}
