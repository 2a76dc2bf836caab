//! Stepper axis trait
//!
//! Abstracts a STEP/DIR/EN driven stepper so the sequences can run
//! against real drivers or a simulation.

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise rotation
    Clockwise,
    /// Counter-clockwise rotation
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Trait for a blocking, open-loop stepper axis
///
/// Step counts are logical steps; an implementation multiplies by its
/// microstep factor. Motion is synchronous: `step` returns after the
/// last pulse.
pub trait StepperAxis {
    /// Energise the driver
    fn enable(&mut self);

    /// Release the driver; the motor no longer holds position
    fn disable(&mut self);

    /// Check if the driver is energised
    fn is_enabled(&self) -> bool;

    /// Emit `steps` logical steps in `direction`
    ///
    /// The driver is enabled first and left enabled. `stop` is polled
    /// after every pulse; when it returns true the move ends early.
    /// Returns the number of logical steps actually taken.
    fn step(&mut self, direction: Direction, steps: u32, stop: &mut dyn FnMut() -> bool) -> u32;

    /// Override the extra delay between steps
    fn set_step_delay_us(&mut self, delay_us: u32);

    /// Current extra delay between steps
    fn step_delay_us(&self) -> u32;
}
