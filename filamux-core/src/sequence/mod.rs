//! Filament load and unload sequences
//!
//! Every sequence is a retry loop: feed a short distance, check a
//! sensor, repeat. When a deadline passes the fault goes through
//! [`Mmu::recover`] and the same loop continues with a fresh deadline.
//! A sequence therefore only returns once its goal is reached.

mod extruder;
mod selector_exit;

use crate::controller::Mmu;
use crate::fault::Fault;
use crate::motion::Deadline;
use crate::traits::Board;

/// Feed length of one retry iteration
pub const RETRY_FEED_MM: u32 = 1;

impl<B: Board> Mmu<B> {
    /// Run `attempt` until it reports success, recovering from `fault`
    /// each time `timeout_ms` passes without progress
    ///
    /// Returns the number of attempts made.
    pub(crate) fn retry_until<F>(&mut self, timeout_ms: u32, fault: Fault, mut attempt: F) -> u32
    where
        F: FnMut(&mut Self) -> bool,
    {
        let mut deadline = Deadline::start(self.now_ms(), timeout_ms);
        let mut attempts = 0u32;
        loop {
            attempts = attempts.saturating_add(1);
            if attempt(self) {
                return attempts;
            }
            if deadline.expired(self.now_ms()) {
                self.recover(fault);
                deadline.restart(self.now_ms());
            }
        }
    }

    /// Steps for one retry iteration
    pub(crate) fn retry_feed_steps(&self) -> u32 {
        self.config.feed.mm_to_steps(RETRY_FEED_MM)
    }
}
