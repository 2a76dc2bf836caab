//! Hardware abstraction traits
//!
//! These traits define the interface between the filament path logic
//! and hardware-specific implementations.

pub mod board;
pub mod sensor;
pub mod stepper;

pub use board::{Board, Clock, FaultSink};
pub use sensor::{FilamentSensor, StatusLed};
pub use stepper::{Direction, StepperAxis};
