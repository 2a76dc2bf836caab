//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use filamux_protocol::PrinterCommand;

/// Channel capacity for printer commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Parsed printer commands, consumed by the controller task
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, PrinterCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Signalled once the printer has sent its first byte
pub static LINK_ACTIVE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Set after LINK_ACTIVE has fired
static LINK_SEEN: AtomicBool = AtomicBool::new(false);

/// Printer lines dropped as too long
static LINES_DROPPED: AtomicU32 = AtomicU32::new(0);

/// Mark the printer link as alive; only the first call signals
pub fn mark_link_active() {
    if !LINK_SEEN.swap(true, Ordering::Relaxed) {
        LINK_ACTIVE.signal(());
    }
}

/// Count a dropped printer line, returning the new total
pub fn count_dropped_line() -> u32 {
    LINES_DROPPED.fetch_add(1, Ordering::Relaxed) + 1
}
