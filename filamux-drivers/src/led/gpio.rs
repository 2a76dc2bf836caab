//! GPIO status LED

use embedded_hal::digital::{OutputPin, PinState};
use filamux_core::traits::StatusLed;

/// LED on a GPIO output
pub struct GpioLed<P> {
    pin: P,
    /// If true, the LED is lit with the pin low
    inverted: bool,
}

impl<P: OutputPin> GpioLed<P> {
    /// Create a new LED output, starting off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self { pin, inverted };
        led.set(false);
        led
    }
}

impl<P: OutputPin> StatusLed for GpioLed<P> {
    fn set(&mut self, on: bool) {
        let _ = self.pin.set_state(PinState::from(on != self.inverted));
    }
}
