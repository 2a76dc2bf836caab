//! Moving filament between the spool side and the selector exit sensor

use crate::controller::Mmu;
use crate::fault::Fault;
use crate::motion::{Deadline, FEED_LOAD, FEED_UNLOAD};
use crate::traits::Board;

impl<B: Board> Mmu<B> {
    /// Feed until the selector exit sensor sees filament, then back the
    /// tip out of the selector head
    pub fn load_to_selector_exit(&mut self) {
        let step = self.retry_feed_steps();
        let timeout = self.config.timing.selector_exit_timeout_ms;

        let attempts = self.retry_until(timeout, Fault::NotAtSelectorExit, |mmu| {
            mmu.feed(FEED_LOAD, step, true);
            mmu.filament_at_selector_exit()
        });
        debug!("Filament at selector exit after {} mm", attempts);

        self.back_off_selector();
    }

    /// Pull filament back until the selector exit sensor clears
    ///
    /// Does nothing when the sensor is already clear. While the extruder
    /// switch still holds the strand a short deadline applies; once the
    /// tip has left the extruder the longer load/unload deadline does.
    pub fn unload_from_selector_exit(&mut self) {
        if !self.filament_at_selector_exit() {
            debug!("Selector exit clear, nothing to unload");
            return;
        }

        let step = self.retry_feed_steps();
        let now = self.now_ms();
        let mut in_extruder = Deadline::start(now, self.config.timing.extruder_release_timeout_ms);
        let mut between = Deadline::start(now, self.config.timing.load_unload_timeout_ms);

        loop {
            let now = self.now_ms();
            if self.filament_at_extruder_entry() {
                if in_extruder.expired(now) {
                    self.recover(Fault::StuckInExtruder);
                    in_extruder.restart(self.now_ms());
                }
            } else if between.expired(now) {
                self.recover(Fault::StuckBetweenStages);
                between.restart(self.now_ms());
            }

            self.feed(FEED_UNLOAD, step, false);

            if !self.filament_at_selector_exit() {
                break;
            }
        }

        self.back_off_selector();
    }

    fn back_off_selector(&mut self) {
        let steps = self.config.feed.mm_to_steps(self.config.feed.unload_back_mm);
        self.feed(FEED_UNLOAD, steps, false);
    }
}
