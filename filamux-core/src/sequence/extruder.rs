//! Moving filament from the selector into the extruder

use crate::config::ExtruderSensorPlacement;
use crate::controller::Mmu;
use crate::fault::Fault;
use crate::motion::FEED_LOAD;
use crate::state::IdlerStatus;
use crate::traits::{Board, StatusLed, StepperAxis};

impl<B: Board> Mmu<B> {
    /// Push filament from the spool through the bowden tube into the
    /// extruder
    ///
    /// Expects the idler engaged on the slot being loaded.
    pub fn load_into_extruder_gear(&mut self) {
        self.deactivate_selector();

        let step = self.retry_feed_steps();
        let timeout = self.config.timing.gear_load_timeout_ms;
        self.retry_until(timeout, Fault::NotAtSelectorExit, |mmu| {
            mmu.feed(FEED_LOAD, step, false);
            mmu.filament_at_selector_exit()
        });

        // A switch already on here means it is stuck or the path is fouled
        while self.filament_at_extruder_entry() {
            self.recover(Fault::ExtruderSwitchStuck);
        }

        let bowden = self.config.feed.mm_to_steps(self.config.feed.mmu_to_extruder_mm);
        self.feed(FEED_LOAD, bowden, true);

        if self.config.feed.sensor_placement == ExtruderSensorPlacement::BeforeGear {
            let timeout = self.config.timing.load_unload_timeout_ms;
            let extra = self.retry_until(timeout, Fault::NotAtExtruder, |mmu| {
                mmu.feed(FEED_LOAD, step, true);
                mmu.filament_at_extruder_entry()
            });
            info!(
                "Filament distance travelled: {} mm",
                self.config.feed.mmu_to_extruder_mm + extra
            );

            let into_gear = self.config.feed.mm_to_steps(self.config.feed.extruder_to_gear_mm);
            self.feed(FEED_LOAD, into_gear, false);
        }
    }

    /// Feed in step with the extruder gear while it grabs the filament
    ///
    /// Returns false without moving when the previous tool change was a
    /// repeat of the loaded slot, or when there is no filament at the
    /// selector exit. Otherwise reports whether the filament arrived.
    pub fn finish_load_with_feed_gear(&mut self) -> bool {
        if self.selection.take_repeat() {
            info!("Filament already loaded, finish load skipped");
            return false;
        }
        if !self.filament_at_selector_exit() {
            warn!("No filament at the selector exit, finish load skipped");
            return false;
        }

        match self.idler_status {
            IdlerStatus::QuickDisengaged => self.partial_reengage(),
            IdlerStatus::Parked => self.engage(self.selection.selected()),
            IdlerStatus::Engaged => {}
        }

        let steps = self.config.feed.finish_load_steps();
        let delay_us = self.config.feed.finish_load_step_delay_us();

        self.hw.led.set(true);
        let saved = self.hw.feed.step_delay_us();
        self.hw.feed.set_step_delay_us(delay_us);
        self.feed(FEED_LOAD, steps, false);
        self.hw.feed.set_step_delay_us(saved);
        self.hw.led.set(false);

        self.partial_disengage();
        self.park();

        match self.config.feed.sensor_placement {
            ExtruderSensorPlacement::BeforeGear => {
                self.delay_ms(self.config.timing.finish_load_grace_ms);
                let loaded = self.filament_at_extruder_entry();
                if !loaded {
                    warn!("Extruder switch did not see the filament after finish load");
                }
                loaded
            }
            ExtruderSensorPlacement::AfterGear => true,
        }
    }
}
