//! Motion bookkeeping
//!
//! Position tracking for the two indexed axes and deadlines for the
//! sensor-gated feed loops.

pub mod position;
pub mod retry;

pub use position::{HomingPlan, Move, MovePlan, PositionTracker, IDLER_POSITIVE, SELECTOR_POSITIVE};
pub use retry::Deadline;

use crate::traits::Direction;

/// Feed direction pushing filament towards the extruder
pub const FEED_LOAD: Direction = Direction::CounterClockwise;

/// Feed direction pulling filament back into the unit
pub const FEED_UNLOAD: Direction = Direction::Clockwise;
