//! Replies sent back to the printer board

use core::fmt::Write;

use heapless::String;

/// Largest encoded reply
pub const MAX_RESPONSE_LEN: usize = 16;

/// Encoded reply bytes
pub type ResponseBuf = String<MAX_RESPONSE_LEN>;

/// Selector → printer reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Plain acknowledgement
    Ok,
    /// Firmware version followed by an acknowledgement
    Version(u16),
    /// Build number followed by an acknowledgement
    BuildNumber(u16),
    /// Selector exit sensor state followed by an acknowledgement
    FilamentPresent(bool),
}

impl Response {
    /// Encode the reply as ASCII
    pub fn encode(&self) -> ResponseBuf {
        let mut out = ResponseBuf::new();
        // Longest reply is "65535ok\n", always fits
        let _ = match self {
            Self::Ok => out.push_str("ok\n").map_err(|_| core::fmt::Error),
            Self::Version(v) | Self::BuildNumber(v) => write!(out, "{}ok\n", v),
            Self::FilamentPresent(present) => {
                write!(out, "{}ok\n", if *present { 1 } else { 0 })
            }
        };
        out
    }
}
