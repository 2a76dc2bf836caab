//! Digital switch input
//!
//! Covers the selector exit sensor, the extruder entry switch and the
//! selector endstop. Reads are direct: no caching, no debouncing.

use embedded_hal::digital::InputPin;
use filamux_core::traits::FilamentSensor;

/// A switch on one GPIO input
pub struct FilamentSwitch<P> {
    pin: P,
    /// If true, the switch is triggered when the pin reads low
    inverted: bool,
}

impl<P: InputPin> FilamentSwitch<P> {
    /// Create a new switch input
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }
}

impl<P: InputPin> FilamentSensor for FilamentSwitch<P> {
    fn is_triggered(&mut self) -> bool {
        // A failed read counts as "no filament"
        match self.pin.is_high() {
            Ok(high) => high != self.inverted,
            Err(_) => false,
        }
    }
}
