//! Printer UART receive task
//!
//! Assembles printer lines and queues the parsed commands.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use filamux_protocol::{LineParser, PrinterCommand};

use crate::channels::{count_dropped_line, mark_link_active, COMMAND_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Printer RX task - receives and parses command lines
#[embassy_executor::task]
pub async fn printer_rx_task(mut rx: BufferedUartRx) {
    info!("Printer RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                mark_link_active();

                // Several commands may arrive in one read
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => match PrinterCommand::parse(&line) {
                            Ok(cmd) => COMMAND_CHANNEL.send(cmd).await,
                            Err(e) => warn!("Failed to parse printer command: {:?}", e),
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            let total = count_dropped_line();
                            warn!("Printer line dropped: {:?} ({} total)", e, total);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
