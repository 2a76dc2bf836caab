//! Tool selection bookkeeping

use crate::slot::Slot;

/// Which slot is loaded and how many changes since the last resync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Selection {
    selected: Slot,
    since_resync: u32,
    total: u32,
    repeat: bool,
}

impl Selection {
    /// Create the power-on selection (slot 0, counters zero)
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot currently believed loaded
    pub fn selected(&self) -> Slot {
        self.selected
    }

    /// Record a completed load of `slot`
    pub fn set_selected(&mut self, slot: Slot) {
        self.selected = slot;
    }

    /// Count a tool change request; slot 0 restarts the resync counter
    pub fn record_tool_change(&mut self, slot: Slot) {
        self.total = self.total.wrapping_add(1);
        self.since_resync = self.since_resync.saturating_add(1);
        if slot == Slot::ZERO {
            self.since_resync = 0;
        }
    }

    /// Tool changes since the last resync
    pub fn since_resync(&self) -> u32 {
        self.since_resync
    }

    /// Tool changes since boot
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Check if the counter has strictly passed `threshold`
    pub fn needs_resync(&self, threshold: u32) -> bool {
        self.since_resync > threshold
    }

    /// Reset the counter after a resync
    pub fn resynced(&mut self) {
        self.since_resync = 0;
    }

    /// Mark or clear "filament already at the extruder"
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Check the repeat flag without consuming it
    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    /// Read and clear the repeat flag
    pub fn take_repeat(&mut self) -> bool {
        core::mem::take(&mut self.repeat)
    }
}
