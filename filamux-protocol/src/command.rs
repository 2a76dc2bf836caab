//! Commands received from the printer board
//!
//! Each line carries an opcode byte and one argument byte. Arguments
//! are passed through raw so that range checks (and the logging of bad
//! values) happen where the command is executed.

/// Errors that can occur while decoding a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line contained no opcode
    Empty,
}

/// Printer → selector command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrinterCommand {
    /// `T<n>`: switch the active filament to slot n
    ToolChange(u8),
    /// `L<n>`: bring slot n to the selector exit
    Load(u8),
    /// `U<n>`: pull the current filament back out of the selector
    Unload(u8),
    /// `C<x>`: push the filament into the extruder drive gear
    FinishLoad,
    /// `S<n>`: ping (0), firmware version (1) or build number (2)
    Status(u8),
    /// `P<x>`: report the selector exit sensor
    FilamentQuery,
    /// `F<n>`: filament type hint, acknowledged only
    FilamentType(u8),
    /// Any other opcode
    Unknown { op: u8, arg: u8 },
}

/// Placeholder for a missing argument byte
pub const NO_ARG: u8 = b'0';

impl PrinterCommand {
    /// Decode a line (terminator already stripped)
    pub fn parse(line: &[u8]) -> Result<Self, CommandError> {
        let (&op, rest) = line.split_first().ok_or(CommandError::Empty)?;
        let arg = rest.first().copied().unwrap_or(NO_ARG);

        Ok(match op {
            b'T' => Self::ToolChange(arg),
            b'L' => Self::Load(arg),
            b'U' => Self::Unload(arg),
            b'C' => Self::FinishLoad,
            b'S' => Self::Status(arg),
            b'P' => Self::FilamentQuery,
            b'F' => Self::FilamentType(arg),
            op => Self::Unknown { op, arg },
        })
    }

    /// Whether the command is echoed to the log when received
    ///
    /// The filament query is polled continuously by the printer and
    /// would flood the log.
    pub fn is_logged(&self) -> bool {
        !matches!(self, Self::FilamentQuery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_opcodes() {
        assert_eq!(PrinterCommand::parse(b"T3"), Ok(PrinterCommand::ToolChange(b'3')));
        assert_eq!(PrinterCommand::parse(b"L0"), Ok(PrinterCommand::Load(b'0')));
        assert_eq!(PrinterCommand::parse(b"U1"), Ok(PrinterCommand::Unload(b'1')));
        assert_eq!(PrinterCommand::parse(b"C0"), Ok(PrinterCommand::FinishLoad));
        assert_eq!(PrinterCommand::parse(b"S2"), Ok(PrinterCommand::Status(b'2')));
        assert_eq!(PrinterCommand::parse(b"P0"), Ok(PrinterCommand::FilamentQuery));
        assert_eq!(PrinterCommand::parse(b"F4"), Ok(PrinterCommand::FilamentType(b'4')));
    }

    #[test]
    fn test_parse_unknown_opcode() {
        assert_eq!(
            PrinterCommand::parse(b"X0"),
            Ok(PrinterCommand::Unknown { op: b'X', arg: b'0' })
        );
    }

    #[test]
    fn test_missing_argument_defaults() {
        assert_eq!(PrinterCommand::parse(b"C"), Ok(PrinterCommand::FinishLoad));
        assert_eq!(PrinterCommand::parse(b"S"), Ok(PrinterCommand::Status(NO_ARG)));
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(PrinterCommand::parse(b""), Err(CommandError::Empty));
    }

    #[test]
    fn test_invalid_argument_is_passed_through() {
        assert_eq!(PrinterCommand::parse(b"T9"), Ok(PrinterCommand::ToolChange(b'9')));
    }

    #[test]
    fn test_filament_query_not_logged() {
        assert!(!PrinterCommand::FilamentQuery.is_logged());
        assert!(PrinterCommand::ToolChange(b'0').is_logged());
    }
}
