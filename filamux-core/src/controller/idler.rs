//! Idler operations
//!
//! Motion side of the idler state machine. Each operation asks the
//! state for a route, moves the roller by the exact tracked delta and
//! switches feed motor power with the engagement.

use crate::slot::Slot;
use crate::state::{IdlerEvent, IdlerRoute, IdlerStatus};
use crate::traits::{Board, StepperAxis};

use super::Mmu;

impl<B: Board> Mmu<B> {
    /// Retract the roller and power down idler and feed
    pub fn park(&mut self) {
        let mv = self.positions.idler_park(&self.config.idler);
        self.run_idler(mv);
        self.hw.idler.disable();
        self.hw.feed.disable();
        self.idler_status = IdlerStatus::Parked;
    }

    /// Press `slot` against the feed gear
    pub fn engage(&mut self, slot: Slot) {
        if self.idler_status.route(IdlerEvent::Engage) == IdlerRoute::ParkFirst {
            debug!("Idler backed off, parking before engaging slot {}", slot.index());
            self.park();
        }

        self.hw.feed.enable();
        let mv = self.positions.idler_to(slot, &self.config.idler);
        self.run_idler(mv);
        self.idler_status = self.idler_status.transition(IdlerEvent::Engage);
    }

    /// Back the roller off one increment, keeping the idler powered
    pub fn quick_disengage(&mut self) {
        self.disengage_by(IdlerEvent::QuickDisengage, self.config.idler.quick_step);
    }

    /// Undo a quick disengage
    pub fn quick_reengage(&mut self) {
        self.reengage_by(IdlerEvent::QuickReengage, self.config.idler.quick_step);
    }

    /// Back the roller off half an increment
    pub fn partial_disengage(&mut self) {
        self.disengage_by(IdlerEvent::PartialDisengage, self.config.idler.partial_step());
    }

    /// Close the roller by half an increment
    pub fn partial_reengage(&mut self) {
        self.reengage_by(IdlerEvent::PartialReengage, self.config.idler.partial_step());
    }

    /// Make sure the roller presses the selected filament, whatever the
    /// current state
    pub fn ensure_engaged(&mut self) {
        match self.idler_status {
            IdlerStatus::Engaged => {}
            IdlerStatus::QuickDisengaged => self.quick_reengage(),
            IdlerStatus::Parked => self.engage(self.selection.selected()),
        }
    }

    fn disengage_by(&mut self, event: IdlerEvent, steps: i32) {
        if self.idler_status.route(event) != IdlerRoute::Direct {
            warn!("Idler {} ignored while {}", event, self.idler_status);
            return;
        }

        let mv = self.positions.idler_offset(steps);
        self.run_idler(mv);
        self.hw.feed.disable();
        self.idler_status = self.idler_status.transition(event);
    }

    fn reengage_by(&mut self, event: IdlerEvent, steps: i32) {
        match self.idler_status.route(event) {
            IdlerRoute::Direct => {
                let mv = self.positions.idler_offset(-steps);
                self.run_idler(mv);
                self.hw.feed.enable();
                self.idler_status = self.idler_status.transition(event);
            }
            IdlerRoute::EngageInstead => self.engage(self.selection.selected()),
            IdlerRoute::ParkFirst | IdlerRoute::Ignore => {
                debug!("Idler {} ignored while {}", event, self.idler_status);
            }
        }
    }
}
