//! Per-slot calibration tables
//!
//! Both the selector comb and the idler roller stop at five positions,
//! laid out on a regular pitch with a small per-slot correction.

use crate::slot::{Slot, SLOT_COUNT};

/// Absolute step position of each slot on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotTable {
    positions: [i32; SLOT_COUNT],
}

impl SlotTable {
    /// Build a table as `pitch * k + offsets[k]`
    pub const fn from_pitch(pitch: i32, offsets: [i32; SLOT_COUNT]) -> Self {
        let mut positions = [0; SLOT_COUNT];
        let mut k = 0;
        while k < SLOT_COUNT {
            positions[k] = pitch * k as i32 + offsets[k];
            k += 1;
        }
        Self { positions }
    }

    /// Calibrated position of a slot
    pub const fn position(&self, slot: Slot) -> i32 {
        self.positions[slot.index()]
    }

    /// Largest calibrated position
    pub fn max(&self) -> i32 {
        self.positions.iter().copied().max().unwrap_or(0)
    }
}
