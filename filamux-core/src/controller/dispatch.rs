//! Printer command dispatch
//!
//! Maps one parsed printer line onto controller operations and decides
//! what, if anything, is written back. The printer waits for `ok` after
//! most commands, so malformed arguments are still acknowledged.

use filamux_protocol::{PrinterCommand, Response};

use crate::slot::Slot;
use crate::traits::Board;

use super::Mmu;

impl<B: Board> Mmu<B> {
    /// Execute `cmd` and return the response to send, if any
    pub fn dispatch(&mut self, cmd: PrinterCommand) -> Option<Response> {
        if cmd.is_logged() {
            info!("MMU command: {}", cmd);
        }

        match cmd {
            PrinterCommand::ToolChange(arg) => {
                match Slot::from_ascii(arg) {
                    Ok(slot) => self.select(slot),
                    Err(e) => warn!("Invalid tool change slot: {:?}", e),
                }
                Some(Response::Ok)
            }
            PrinterCommand::Load(arg) => {
                match Slot::from_ascii(arg) {
                    Ok(slot) => self.load(slot),
                    Err(e) => warn!("Invalid load slot: {:?}", e),
                }
                self.acknowledge_later()
            }
            PrinterCommand::Unload(arg) => {
                match Slot::from_ascii(arg) {
                    Ok(_) => self.unload(),
                    Err(e) => warn!("Invalid unload slot: {:?}", e),
                }
                self.acknowledge_later()
            }
            PrinterCommand::FinishLoad => {
                if self.finish_load() {
                    Some(Response::Ok)
                } else {
                    warn!("Finish load failed, not acknowledging");
                    None
                }
            }
            PrinterCommand::Status(b'0') => Some(Response::Ok),
            PrinterCommand::Status(b'1') => Some(Response::Version(self.config.link.fw_version)),
            PrinterCommand::Status(b'2') => {
                Some(Response::BuildNumber(self.config.link.build_number))
            }
            PrinterCommand::Status(arg) => {
                warn!("Unsupported status request {}", arg as char);
                None
            }
            PrinterCommand::FilamentQuery => {
                Some(Response::FilamentPresent(self.filament_at_selector_exit()))
            }
            PrinterCommand::FilamentType(_) => Some(Response::Ok),
            PrinterCommand::Unknown { op, .. } => {
                warn!("Unrecognized command {}", op as char);
                Some(Response::Ok)
            }
        }
    }

    fn acknowledge_later(&mut self) -> Option<Response> {
        self.delay_ms(self.config.timing.ack_delay_ms);
        Some(Response::Ok)
    }
}
