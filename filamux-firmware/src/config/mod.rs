//! Configuration loading and parsing
//!
//! The configuration is compiled in from `mmu.toml` and parsed at boot
//! by a custom no_std parser.

pub mod toml;

pub use toml::{parse_config, ParseError};
