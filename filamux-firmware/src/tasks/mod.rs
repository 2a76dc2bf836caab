//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod printer_rx;

pub use controller::controller_task;
pub use printer_rx::printer_rx_task;
