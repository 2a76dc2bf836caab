//! Printer link protocol for the Filamux selector
//!
//! The printer board talks to the selector over a plain serial line.
//! Every request is a two-character command terminated by a newline:
//!
//! ```text
//! ┌────┬─────┬────────┐
//! │ OP │ ARG │ \n/\r  │
//! │ 1B │ 1B  │ 1B     │
//! └────┴─────┴────────┘
//! ```
//!
//! Replies are ASCII: an optional payload followed by `ok\n`. A debug
//! console on a second UART uses the same line framing with its own
//! small command set.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod console;
pub mod line;
pub mod response;

pub use command::{CommandError, PrinterCommand};
pub use console::ConsoleCommand;
pub use line::{Line, LineError, LineParser, MAX_LINE_LEN};
pub use response::{Response, ResponseBuf, MAX_RESPONSE_LEN};

/// Announcement written to the printer once at boot
pub const START_ANNOUNCEMENT: &[u8] = b"start\n";
