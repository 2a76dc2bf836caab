//! Configuration types
//!
//! Board-agnostic configuration structures. Defaults reproduce the
//! stock calibration of the unit; the firmware overrides them from its
//! embedded TOML file.

pub mod calibration;
pub mod hardware;
pub mod types;

pub use calibration::*;
pub use hardware::*;
pub use types::*;
