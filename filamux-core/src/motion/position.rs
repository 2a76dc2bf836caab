//! Open-loop position tracking for the selector and idler axes
//!
//! The tracker never touches hardware. Each operation returns the
//! exact moves needed to get from the tracked position to the target
//! and updates the tracked position as if those moves succeed. Drift
//! is bounded by re-homing, not by feedback.
//!
//! Direction conventions:
//! - selector: increasing position is clockwise (towards the endstop)
//! - idler: increasing position is counter-clockwise (towards park)

use heapless::Vec;

use crate::config::{IdlerConfig, SelectorConfig};
use crate::slot::Slot;
use crate::traits::Direction;

/// Selector direction for increasing position
pub const SELECTOR_POSITIVE: Direction = Direction::Clockwise;

/// Idler direction for increasing position
pub const IDLER_POSITIVE: Direction = Direction::CounterClockwise;

/// A relative move of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Move {
    pub direction: Direction,
    pub steps: u32,
}

impl Move {
    /// Create a move
    pub const fn new(direction: Direction, steps: u32) -> Self {
        Self { direction, steps }
    }

    /// Move covering a signed delta, `positive` being the direction of
    /// increasing position
    pub fn for_delta(delta: i32, positive: Direction) -> Self {
        let direction = if delta < 0 { positive.opposite() } else { positive };
        Self::new(direction, delta.unsigned_abs())
    }

    /// Check if the move has no steps
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Signed change in position this move produces
    pub fn delta(&self, positive: Direction) -> i32 {
        if self.direction == positive {
            self.steps as i32
        } else {
            -(self.steps as i32)
        }
    }
}

/// Ordered moves for one operation
pub type MovePlan = Vec<Move, 2>;

/// Two-phase homing: run into the endstop, then into the hard stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingPlan {
    /// First leg; may end early on a limit
    pub approach: Move,
    /// Second leg, forced into the reference stop
    pub seat: Move,
}

/// Tracked absolute positions of the selector and idler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionTracker {
    selector: i32,
    idler: i32,
    /// Slot the idler was last driven to
    idler_slot: Slot,
}

impl PositionTracker {
    /// Create a tracker for an axis pair that has just been homed
    pub fn new(idler: &IdlerConfig) -> Self {
        Self {
            selector: 0,
            idler: idler.parked_position,
            idler_slot: Slot::ZERO,
        }
    }

    /// Tracked selector position
    pub fn selector(&self) -> i32 {
        self.selector
    }

    /// Tracked idler position
    pub fn idler(&self) -> i32 {
        self.idler
    }

    /// Slot the idler was last driven to
    pub fn idler_slot(&self) -> Slot {
        self.idler_slot
    }

    /// Plan a selector move to `slot`
    ///
    /// Slot 0 is approached from the left hard stop: over-travel past
    /// zero by `slot0_force`, then come back to the calibrated offset.
    /// This lands on the same physical position whatever the drift.
    pub fn selector_to(&mut self, slot: Slot, config: &SelectorConfig) -> MovePlan {
        let target = config.table().position(slot);
        let mut plan = MovePlan::new();

        if slot == Slot::ZERO {
            let overtravel = (self.selector + config.slot0_force).max(0);
            let _ = plan.push(Move::for_delta(-overtravel, SELECTOR_POSITIVE));
            let _ = plan.push(Move::for_delta(target, SELECTOR_POSITIVE));
        } else {
            let _ = plan.push(Move::for_delta(target - self.selector, SELECTOR_POSITIVE));
        }

        self.selector = target;
        plan
    }

    /// Plan selector homing from an unknown position
    pub fn selector_home(&mut self, config: &SelectorConfig) -> HomingPlan {
        self.selector = 0;
        HomingPlan {
            approach: Move::new(SELECTOR_POSITIVE, config.max_travel.max(0) as u32),
            seat: Move::new(
                SELECTOR_POSITIVE.opposite(),
                (config.max_travel + config.right_force).max(0) as u32,
            ),
        }
    }

    /// Plan a selector resync from the tracked position
    ///
    /// Shorter than a full home: only the remaining distance to the
    /// endstop is travelled before seating against the left stop.
    pub fn selector_resync(&mut self, config: &SelectorConfig) -> HomingPlan {
        let remaining = (config.max_travel - self.selector).max(0) as u32;
        let mut plan = self.selector_home(config);
        plan.approach.steps = remaining;
        plan
    }

    /// Plan an idler move to `slot`
    pub fn idler_to(&mut self, slot: Slot, config: &IdlerConfig) -> Move {
        let target = config.table().position(slot);
        let mv = Move::for_delta(target - self.idler, IDLER_POSITIVE);
        self.idler = target;
        self.idler_slot = slot;
        mv
    }

    /// Plan an idler move to the parked position
    pub fn idler_park(&mut self, config: &IdlerConfig) -> Move {
        let mv = Move::for_delta(config.parked_position - self.idler, IDLER_POSITIVE);
        self.idler = config.parked_position;
        mv
    }

    /// Plan a relative idler move; positive backs the roller off
    pub fn idler_offset(&mut self, steps: i32) -> Move {
        self.idler += steps;
        Move::for_delta(steps, IDLER_POSITIVE)
    }

    /// Plan idler homing: into the zero stop, then out to park
    pub fn idler_home(&mut self, config: &IdlerConfig) -> HomingPlan {
        let travel = config.parked_position.max(0) as u32;
        self.idler = config.parked_position;
        HomingPlan {
            approach: Move::new(IDLER_POSITIVE.opposite(), travel),
            seat: Move::new(IDLER_POSITIVE, travel),
        }
    }
}
