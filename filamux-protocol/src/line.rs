//! Line assembly for the printer link and the debug console.
//!
//! Bytes arrive in arbitrary chunks; a line ends at `\n` or `\r`.
//! Empty lines (e.g. the `\n` of a `\r\n` pair) are swallowed.

use heapless::Vec;

/// Maximum accepted line length in bytes (terminator excluded)
pub const MAX_LINE_LEN: usize = 16;

/// One complete, non-empty line without its terminator
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN`; bytes up to the next terminator are dropped
    TooLong,
}

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Collecting bytes of the current line
    Reading,
    /// Overflowed, discarding until the next terminator
    Discarding,
}

/// Incremental line parser
pub struct LineParser {
    state: ParseState,
    buffer: Line,
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Reading,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::Reading;
        self.buffer.clear();
    }

    /// Whether part of a line has been received
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty
    /// line, `Ok(None)` when more bytes are needed, or `Err` once when a
    /// line overflows.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        let terminator = byte == b'\n' || byte == b'\r';

        match self.state {
            ParseState::Discarding => {
                if terminator {
                    self.reset();
                }
                Ok(None)
            }
            ParseState::Reading if terminator => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.clone();
                self.buffer.clear();
                Ok(Some(line))
            }
            ParseState::Reading => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = ParseState::Discarding;
                    return Err(LineError::TooLong);
                }
                Ok(None)
            }
        }
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut LineParser, bytes: &[u8]) -> Vec<Line, 8> {
        let mut lines = Vec::new();
        for &b in bytes {
            if let Ok(Some(line)) = parser.feed(b) {
                lines.push(line).unwrap();
            }
        }
        lines
    }

    #[test]
    fn test_single_line() {
        let mut parser = LineParser::new();
        let lines = feed_all(&mut parser, b"T2\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_slice(), b"T2");
        assert!(!parser.is_pending());
    }

    #[test]
    fn test_several_commands_in_one_read() {
        let mut parser = LineParser::new();
        let lines = feed_all(&mut parser, b"S1\nP0\r\nC0\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].as_slice(), b"S1");
        assert_eq!(lines[1].as_slice(), b"P0");
        assert_eq!(lines[2].as_slice(), b"C0");
    }

    #[test]
    fn test_split_across_reads() {
        let mut parser = LineParser::new();
        assert!(feed_all(&mut parser, b"L").is_empty());
        assert!(parser.is_pending());
        let lines = feed_all(&mut parser, b"3\r");
        assert_eq!(lines[0].as_slice(), b"L3");
    }

    #[test]
    fn test_overflow_then_recover() {
        let mut parser = LineParser::new();
        let mut overflowed = false;
        for _ in 0..MAX_LINE_LEN + 4 {
            if parser.feed(b'x') == Err(LineError::TooLong) {
                overflowed = true;
            }
        }
        assert!(overflowed);

        // Rest of the long line is discarded, next line parses normally
        let lines = feed_all(&mut parser, b"xx\nU0\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_slice(), b"U0");
    }

    #[test]
    fn test_empty_lines_ignored() {
        let mut parser = LineParser::new();
        assert!(feed_all(&mut parser, b"\r\n\n\r").is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parser_never_yields_terminators_or_empty_lines(
                bytes in proptest::collection::vec(any::<u8>(), 0..256)
            ) {
                let mut parser = LineParser::new();
                for b in bytes {
                    if let Ok(Some(line)) = parser.feed(b) {
                        prop_assert!(!line.is_empty());
                        prop_assert!(!line.contains(&b'\n'));
                        prop_assert!(!line.contains(&b'\r'));
                    }
                }
            }
        }
    }
}
