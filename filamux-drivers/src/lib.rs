//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in filamux-core on top of `embedded-hal` 1.0 pins and delays:
//!
//! - STEP/DIR/EN stepper axes with per-axis pulse timing
//! - Digital filament switches with configurable polarity
//! - A GPIO status LED

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod led;
pub mod sensor;
pub mod stepper;

pub use led::GpioLed;
pub use sensor::FilamentSwitch;
pub use stepper::StepDirAxis;
