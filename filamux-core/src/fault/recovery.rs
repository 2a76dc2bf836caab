//! Operator-assisted fault recovery

use crate::controller::Mmu;
use crate::traits::{Board, FaultSink, StepperAxis};

use super::Fault;

impl<B: Board> Mmu<B> {
    /// Release the filament, wait for the operator, then re-engage
    ///
    /// The idler parks and the selector is released so the strand can
    /// be moved by hand. When the fault sink returns, the idler goes
    /// back to the slot it last pressed and the calling loop retries.
    pub fn recover(&mut self, fault: Fault) {
        error!("Filament fault: {}", fault.message());

        self.park();
        self.hw.selector.disable();

        self.hw.faults.on_fault(fault);

        let slot = self.positions.idler_slot();
        self.engage(slot);
        self.hw.selector.enable();
        self.delay_ms(self.config.timing.recovery_pause_ms);
        info!("Recovered from {}, retrying", fault);
    }
}
