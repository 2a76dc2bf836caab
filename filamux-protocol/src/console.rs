//! Debug console commands
//!
//! Typed by an operator on the secondary UART. Single letters, with a
//! slot digit for the tool change.

use crate::command::CommandError;

/// Operator command from the debug console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleCommand {
    /// `C`: finish load into the extruder gear
    FinishLoad,
    /// `T<n>`: tool change to slot n (raw digit)
    ToolChange(u8),
    /// `U`: unload the current filament and park
    Unload,
    /// `D`: drive both axes through every slot
    Exercise,
    /// `Z`: print the sensor inputs
    SensorReport,
    /// `A`: repeated tool change soak test
    SoakTest,
    /// Anything else
    Unknown(u8),
}

impl ConsoleCommand {
    /// Decode an operator line; letters are case-insensitive
    pub fn parse(line: &[u8]) -> Result<Self, CommandError> {
        let (&op, rest) = line.split_first().ok_or(CommandError::Empty)?;

        Ok(match op.to_ascii_uppercase() {
            b'C' => Self::FinishLoad,
            b'T' => Self::ToolChange(rest.first().copied().unwrap_or(b'?')),
            b'U' => Self::Unload,
            b'D' => Self::Exercise,
            b'Z' => Self::SensorReport,
            b'A' => Self::SoakTest,
            _ => Self::Unknown(op),
        })
    }

    /// Whether the command only exists in diagnostic builds
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Exercise | Self::SoakTest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_console_commands() {
        assert_eq!(ConsoleCommand::parse(b"c"), Ok(ConsoleCommand::FinishLoad));
        assert_eq!(ConsoleCommand::parse(b"T4"), Ok(ConsoleCommand::ToolChange(b'4')));
        assert_eq!(ConsoleCommand::parse(b"t"), Ok(ConsoleCommand::ToolChange(b'?')));
        assert_eq!(ConsoleCommand::parse(b"U"), Ok(ConsoleCommand::Unload));
        assert_eq!(ConsoleCommand::parse(b"z"), Ok(ConsoleCommand::SensorReport));
        assert_eq!(ConsoleCommand::parse(b"Q"), Ok(ConsoleCommand::Unknown(b'Q')));
        assert_eq!(ConsoleCommand::parse(b""), Err(CommandError::Empty));
    }

    #[test]
    fn test_diagnostic_commands() {
        assert!(ConsoleCommand::Exercise.is_diagnostic());
        assert!(ConsoleCommand::SoakTest.is_diagnostic());
        assert!(!ConsoleCommand::Unload.is_diagnostic());
    }
}
