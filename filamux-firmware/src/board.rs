//! RP2040 board assembly
//!
//! Builds the controller hardware from the pin numbers in the
//! configuration. GPIO is handed out by number from a [`PinBank`], so
//! pin assignment lives entirely in `mmu.toml`.

use defmt::*;
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use embassy_time::{block_for, Delay, Duration, Instant};

use filamux_core::config::{AxisPins, AxisTiming, PinConfig, PinsConfig};
use filamux_core::traits::{Board, Clock};
use filamux_core::Hardware;
use filamux_drivers::{FilamentSwitch, GpioLed, StepDirAxis};

use crate::console::Console;

/// Number of GPIO on the RP2040
const PIN_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken by another function
    AlreadyTaken(u8),
}

/// GPIO still available for config-driven assignment
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; PIN_COUNT],
}

impl PinBank {
    /// Create a pin bank; `None` entries are reserved (UART pins)
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; PIN_COUNT]) -> Self {
        Self { pins }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin(pin_num))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }

    fn output(&mut self, config: PinConfig, level: Level) -> Result<Output<'static>, PinError> {
        Ok(Output::new(self.take(config.pin)?, level))
    }

    fn input(&mut self, config: PinConfig) -> Result<Input<'static>, PinError> {
        let pull = if config.pull_up { Pull::Up } else { Pull::None };
        Ok(Input::new(self.take(config.pin)?, pull))
    }
}

/// Stepper axis on the RP2040 GPIO
pub type Axis = StepDirAxis<Output<'static>, Output<'static>, Output<'static>, Delay>;

/// Switch input on the RP2040 GPIO
pub type Switch = FilamentSwitch<Input<'static>>;

/// Monotonic clock on the embassy time driver
///
/// Delays busy-wait: motion and sensor polling block the executor by
/// design, and UART bytes keep arriving in the interrupt ring buffers.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&mut self) -> u64 {
        Instant::now().as_millis()
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}

/// The SKR Pico style RP2040 board
pub struct Rp2040Board;

impl Board for Rp2040Board {
    type Selector = Axis;
    type Idler = Axis;
    type Feed = Axis;
    type Sensor = Switch;
    type Clock = EmbassyClock;
    type Faults = Console;
    type Led = GpioLed<Output<'static>>;
}

fn axis(bank: &mut PinBank, pins: AxisPins, timing: AxisTiming) -> Result<Axis, PinError> {
    if pins.step.inverted || pins.dir.inverted {
        warn!("Step/dir inversion not supported on gpio{}, ignored", pins.step.pin);
    }
    let step = bank.output(pins.step, Level::Low)?;
    let dir = bank.output(pins.dir, Level::Low)?;
    // Start with the driver released
    let enable_level = if pins.enable.inverted { Level::High } else { Level::Low };
    let enable = bank.output(pins.enable, enable_level)?;

    Ok(StepDirAxis::new(step, dir, enable, Delay, timing, pins.enable.inverted))
}

fn switch(bank: &mut PinBank, pin: PinConfig) -> Result<Switch, PinError> {
    Ok(FilamentSwitch::new(bank.input(pin)?, pin.inverted))
}

/// Claim every pin the unit needs and wrap it in its driver
pub fn build_hardware(
    bank: &mut PinBank,
    pins: &PinsConfig,
    timings: [AxisTiming; 3],
    console: Console,
) -> Result<Hardware<Rp2040Board>, PinError> {
    let [selector_timing, idler_timing, feed_timing] = timings;
    let led_level = if pins.led.inverted { Level::High } else { Level::Low };

    Ok(Hardware {
        selector: axis(bank, pins.selector, selector_timing)?,
        idler: axis(bank, pins.idler, idler_timing)?,
        feed: axis(bank, pins.feed, feed_timing)?,
        selector_exit: switch(bank, pins.selector_exit)?,
        extruder_entry: switch(bank, pins.extruder_entry)?,
        selector_endstop: switch(bank, pins.selector_endstop)?,
        clock: EmbassyClock,
        faults: console,
        led: GpioLed::new(bank.output(pins.led, led_level)?, pins.led.inverted),
    })
}
