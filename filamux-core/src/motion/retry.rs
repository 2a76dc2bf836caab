//! Elapsed-time deadlines for sensor-gated retry loops

/// A restartable timeout measured in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    started_ms: u64,
    timeout_ms: u32,
}

impl Deadline {
    /// Start a deadline at `now_ms`
    pub fn start(now_ms: u64, timeout_ms: u32) -> Self {
        Self {
            started_ms: now_ms,
            timeout_ms,
        }
    }

    /// Check if strictly more than the timeout has elapsed
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) > u64::from(self.timeout_ms)
    }

    /// Restart from `now_ms`
    pub fn restart(&mut self, now_ms: u64) {
        self.started_ms = now_ms;
    }

    /// Milliseconds elapsed since the last (re)start
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }
}
