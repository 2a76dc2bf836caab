//! Board bundle and blocking collaborators

use crate::fault::Fault;

use super::sensor::{FilamentSensor, StatusLed};
use super::stepper::StepperAxis;

/// Monotonic time plus blocking delays
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&mut self) -> u64;

    /// Busy-wait for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Receives faults raised by a sequence
///
/// `on_fault` may block until an operator has cleared the problem; the
/// sequence resumes its retry loop when it returns.
pub trait FaultSink {
    fn on_fault(&mut self, fault: Fault);
}

/// Concrete hardware types a controller is built from
pub trait Board {
    type Selector: StepperAxis;
    type Idler: StepperAxis;
    type Feed: StepperAxis;
    type Sensor: FilamentSensor;
    type Clock: Clock;
    type Faults: FaultSink;
    type Led: StatusLed;
}
