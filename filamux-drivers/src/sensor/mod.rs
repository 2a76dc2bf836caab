//! Filament and limit switch inputs

pub mod switch;

pub use switch::FilamentSwitch;
