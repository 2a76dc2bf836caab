//! Binary filament sensors

/// A digital presence sensor or limit switch
///
/// Reads are direct: no caching, no debouncing. Polarity is resolved
/// by the implementation so `true` always means "filament present" or
/// "switch hit".
pub trait FilamentSensor {
    fn is_triggered(&mut self) -> bool;
}

/// Indicator LED
pub trait StatusLed {
    fn set(&mut self, on: bool);
}
