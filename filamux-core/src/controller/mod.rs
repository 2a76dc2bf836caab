//! The Filamux controller
//!
//! [`Mmu`] owns the hardware and all runtime state. Every operation
//! runs to completion on the caller's thread; motion and sensor polling
//! block, and a fault blocks until the sink returns.

mod console;
mod dispatch;
mod idler;
mod toolchange;

pub use console::SensorReport;

use crate::config::MmuConfig;
use crate::fault::Fault;
use crate::motion::{HomingPlan, Move, PositionTracker};
use crate::slot::Slot;
use crate::state::{IdlerStatus, Selection};
use crate::traits::{Board, Clock, Direction, FilamentSensor, StepperAxis};

/// Hardware instances making up one unit
pub struct Hardware<B: Board> {
    pub selector: B::Selector,
    pub idler: B::Idler,
    pub feed: B::Feed,
    /// Filament sensor just past the selector
    pub selector_exit: B::Sensor,
    /// Filament switch at the extruder entry
    pub extruder_entry: B::Sensor,
    /// Limit switch at the far end of selector travel
    pub selector_endstop: B::Sensor,
    pub clock: B::Clock,
    pub faults: B::Faults,
    pub led: B::Led,
}

/// Filament selector controller
pub struct Mmu<B: Board> {
    pub(crate) hw: Hardware<B>,
    pub(crate) config: MmuConfig,
    pub(crate) positions: PositionTracker,
    pub(crate) idler_status: IdlerStatus,
    pub(crate) selection: Selection,
}

impl<B: Board> Mmu<B> {
    /// Create a controller; call [`init`](Self::init) before use
    pub fn new(hw: Hardware<B>, config: MmuConfig) -> Self {
        Self {
            positions: PositionTracker::new(&config.idler),
            idler_status: IdlerStatus::Parked,
            selection: Selection::new(),
            hw,
            config,
        }
    }

    /// Home both axes and reset all state
    ///
    /// The selector is left unhomed when filament sits in it; moving
    /// the comb would shear the strand.
    pub fn init(&mut self) {
        self.hw.selector.disable();
        self.hw.idler.disable();
        self.hw.feed.disable();
        self.selection = Selection::new();

        info!("Homing idler");
        self.home_idler();

        info!("Homing selector");
        if self.filament_at_selector_exit() {
            warn!("Filament present in the selector, skipping selector homing");
        } else {
            self.home_selector();
        }

        info!("Initialization complete");
    }

    /// Unit configuration
    pub fn config(&self) -> &MmuConfig {
        &self.config
    }

    /// Current idler state
    pub fn idler_status(&self) -> IdlerStatus {
        self.idler_status
    }

    /// Slot currently believed loaded
    pub fn selected_slot(&self) -> Slot {
        self.selection.selected()
    }

    /// Selection bookkeeping
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Tracked axis positions
    pub fn positions(&self) -> &PositionTracker {
        &self.positions
    }

    /// Hardware access, mainly for diagnostics and tests
    pub fn hardware(&mut self) -> &mut Hardware<B> {
        &mut self.hw
    }

    /// Filament present just past the selector
    pub fn filament_at_selector_exit(&mut self) -> bool {
        self.hw.selector_exit.is_triggered()
    }

    /// Filament present at the extruder entry
    pub fn filament_at_extruder_entry(&mut self) -> bool {
        self.hw.extruder_entry.is_triggered()
    }

    /// Energise the selector motor
    pub fn activate_selector(&mut self) {
        self.hw.selector.enable();
        self.hw.clock.delay_ms(1);
    }

    /// Release the selector motor if configured to save current
    pub fn deactivate_selector(&mut self) {
        if self.config.selector.power_down_when_idle {
            self.hw.selector.disable();
            self.hw.clock.delay_ms(1);
        }
    }

    /// Home the selector: run to the endstop, then seat at the left stop
    pub fn home_selector(&mut self) {
        let plan = self.positions.selector_home(&self.config.selector);
        self.run_selector_homing(plan);
        self.hw.selector.disable();
    }

    /// Re-home the selector from its tracked position
    pub fn resync_selector(&mut self) {
        info!(
            "Resyncing selector from {} (slot {})",
            self.positions.selector(),
            self.selection.selected().index()
        );
        let plan = self.positions.selector_resync(&self.config.selector);
        self.run_selector_homing(plan);
    }

    /// Home the idler: into the zero stop, then out to park
    pub fn home_idler(&mut self) {
        let plan = self.positions.idler_home(&self.config.idler);
        self.run_idler(plan.approach);
        self.run_idler(plan.seat);
        self.hw.idler.disable();
        self.idler_status = IdlerStatus::Parked;
    }

    /// Move the selector comb to `slot`
    ///
    /// Refuses to move while filament sits in the selector; the fault is
    /// raised and retried until it clears.
    pub fn selector_go_to(&mut self, slot: Slot) {
        while self.filament_at_selector_exit() {
            self.recover(Fault::FilamentInSelector);
        }

        let plan = self.positions.selector_to(slot, &self.config.selector);
        for mv in plan {
            self.hw.selector.step(mv.direction, mv.steps, &mut || false);
        }
        if self.config.selector.power_down_when_idle {
            self.hw.selector.disable();
        }
    }

    fn run_selector_homing(&mut self, plan: HomingPlan) {
        let Hardware {
            selector,
            selector_endstop,
            ..
        } = &mut self.hw;
        let taken = selector.step(plan.approach.direction, plan.approach.steps, &mut || {
            selector_endstop.is_triggered()
        });
        debug!("Selector endstop after {} of {} steps", taken, plan.approach.steps);
        selector.step(plan.seat.direction, plan.seat.steps, &mut || false);
    }

    pub(crate) fn run_idler(&mut self, mv: Move) {
        if !mv.is_empty() {
            self.hw.idler.step(mv.direction, mv.steps, &mut || false);
        }
    }

    /// Feed `steps`, optionally stopping as soon as the extruder switch trips
    pub(crate) fn feed(&mut self, direction: Direction, steps: u32, stop_at_extruder: bool) -> u32 {
        let Hardware {
            feed,
            extruder_entry,
            ..
        } = &mut self.hw;
        if stop_at_extruder {
            feed.step(direction, steps, &mut || extruder_entry.is_triggered())
        } else {
            feed.step(direction, steps, &mut || false)
        }
    }

    pub(crate) fn now_ms(&mut self) -> u64 {
        self.hw.clock.now_ms()
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.hw.clock.delay_ms(ms);
    }
}
