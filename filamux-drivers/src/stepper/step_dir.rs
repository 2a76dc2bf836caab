//! Bit-banged STEP/DIR/EN stepper driver
//!
//! Drives an A4988/TMC-style driver in standalone mode. Every logical
//! step emits `microsteps` pulses with the axis timing; the calling
//! thread is blocked for the duration of the move.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use filamux_core::config::AxisTiming;
use filamux_core::traits::{Direction, StepperAxis};

/// Stepper axis on three GPIO outputs
pub struct StepDirAxis<STEP, DIR, EN, D> {
    step_pin: STEP,
    dir_pin: DIR,
    enable_pin: EN,
    delay: D,
    timing: AxisTiming,
    /// Current extra delay between pulses
    step_delay_us: u32,
    /// If true, the driver is enabled with EN low
    enable_inverted: bool,
    enabled: bool,
}

impl<STEP, DIR, EN, D> StepDirAxis<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    /// Create a new axis, starting disabled
    ///
    /// # Arguments
    /// - `timing`: pulse widths, step delay and microstep factor
    /// - `enable_inverted`: driver is enabled when EN is low
    pub fn new(
        step_pin: STEP,
        dir_pin: DIR,
        enable_pin: EN,
        delay: D,
        timing: AxisTiming,
        enable_inverted: bool,
    ) -> Self {
        let mut axis = Self {
            step_pin,
            dir_pin,
            enable_pin,
            delay,
            timing,
            step_delay_us: timing.step_delay_us,
            enable_inverted,
            enabled: true,
        };
        let _ = axis.step_pin.set_low();
        axis.disable();
        axis
    }

    fn set_enable_pin(&mut self, enabled: bool) {
        let state = PinState::from(enabled != self.enable_inverted);
        let _ = self.enable_pin.set_state(state);
        self.enabled = enabled;
    }

    fn pulse(&mut self) {
        let _ = self.step_pin.set_high();
        self.delay.delay_us(self.timing.pulse_high_us);
        let _ = self.step_pin.set_low();
        if self.timing.pulse_low_us > 0 {
            self.delay.delay_us(self.timing.pulse_low_us);
        }
        if self.step_delay_us > 0 {
            self.delay.delay_us(self.step_delay_us);
        }
    }
}

impl<STEP, DIR, EN, D> StepperAxis for StepDirAxis<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    fn enable(&mut self) {
        self.set_enable_pin(true);
    }

    fn disable(&mut self) {
        self.set_enable_pin(false);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn step(&mut self, direction: Direction, steps: u32, stop: &mut dyn FnMut() -> bool) -> u32 {
        if !self.enabled {
            self.enable();
        }

        // DIR low turns clockwise
        let state = PinState::from(direction == Direction::CounterClockwise);
        let _ = self.dir_pin.set_state(state);
        self.delay.delay_us(self.timing.settle_us);

        let pulses = self.timing.microsteps.max(1);
        for taken in 1..=steps {
            for _ in 0..pulses {
                self.pulse();
            }
            if stop() {
                return taken;
            }
        }
        steps
    }

    fn set_step_delay_us(&mut self, delay_us: u32) {
        self.step_delay_us = delay_us;
    }

    fn step_delay_us(&self) -> u32 {
        self.step_delay_us
    }
}
