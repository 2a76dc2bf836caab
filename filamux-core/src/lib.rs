//! Board-agnostic filament path control for the Filamux selector
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Hardware abstraction traits (stepper axes, sensors, clock, fault sink)
//! - Position tracking for the selector comb and the idler roller
//! - The idler engagement state machine
//! - Filament load/unload sequences with timeout-driven fault recovery
//! - The tool-change orchestrator and the printer command dispatcher
//! - Configuration types with the stock calibration as defaults

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod fault;
pub mod motion;
pub mod sequence;
pub mod slot;
pub mod state;
pub mod traits;

pub use config::MmuConfig;
pub use controller::{Hardware, Mmu, SensorReport};
pub use fault::Fault;
pub use slot::{Slot, SlotError};
