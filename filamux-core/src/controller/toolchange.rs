//! Tool-change orchestration
//!
//! Sequences the idler, the selector and the filament moves for the
//! printer's tool change, load and unload requests.

use crate::slot::Slot;
use crate::traits::Board;

use super::Mmu;

impl<B: Board> Mmu<B> {
    /// Switch the extruder over to `slot`
    ///
    /// Repeating the loaded slot with filament already in place only
    /// sets the repeat flag, so the next finish load is skipped.
    pub fn select(&mut self, slot: Slot) {
        self.selection.record_tool_change(slot);
        info!(
            "Tool change to slot {} (change {}, {} since resync)",
            slot.index(),
            self.selection.total(),
            self.selection.since_resync()
        );

        if slot == self.selection.selected() {
            if self.filament_at_selector_exit() {
                info!("Slot {} already loaded", slot.index());
                self.selection.set_repeat(true);
            } else {
                info!("Slot {} selected but not loaded, loading", slot.index());
                self.engage(slot);
                self.selector_go_to(slot);
                self.load_into_extruder_gear();
                self.quick_disengage();
                self.selection.set_repeat(false);
            }
            return;
        }

        self.selection.set_repeat(false);

        if self.filament_at_selector_exit() {
            let current = self.selection.selected();
            debug!("Unloading slot {} first", current.index());
            self.engage(current);
            self.unload_from_selector_exit();
        }

        if self.selection.needs_resync(self.config.selector.resync_threshold) {
            self.resync_selector();
            self.activate_selector();
            self.selection.resynced();
        }

        self.engage(slot);
        self.selector_go_to(slot);
        self.load_into_extruder_gear();
        self.selection.set_selected(slot);
        self.quick_disengage();
    }

    /// Bring filament of `slot` up to the selector exit and release it
    pub fn load(&mut self, slot: Slot) {
        self.ensure_engaged();
        self.activate_selector();

        self.engage(slot);
        self.selection.set_selected(slot);
        self.selector_go_to(slot);
        self.load_to_selector_exit();
        self.park();
    }

    /// Pull the current filament back behind the selector
    pub fn unload(&mut self) {
        self.ensure_engaged();
        self.unload_from_selector_exit();
        self.park();
    }

    /// Finish a tool change by feeding into the extruder gear
    pub fn finish_load(&mut self) -> bool {
        self.finish_load_with_feed_gear()
    }
}
