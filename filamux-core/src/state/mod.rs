//! Runtime state of the unit
//!
//! Idler engagement and the tool selection bookkeeping. Both live
//! inside the controller and change only through its operations.

pub mod idler;
pub mod selection;

pub use idler::{IdlerEvent, IdlerRoute, IdlerStatus};
pub use selection::Selection;
