//! Debug console on the second UART
//!
//! Line commands for bench work, and the operator side of fault
//! recovery: a fault is printed and the unit waits for any key.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{block_for, Duration};

use filamux_core::traits::FaultSink;
use filamux_core::Fault;
use filamux_protocol::{ConsoleCommand, LineParser};

/// Pause used instead of the key press when acknowledgement is off
const UNATTENDED_PAUSE_MS: u64 = 1;

/// Console UART halves plus line assembly state
pub struct Console {
    rx: BufferedUartRx,
    tx: BufferedUartTx,
    parser: LineParser,
    /// Wait for a key press before resuming after a fault
    wait_for_key: bool,
}

impl Console {
    /// Create a console on a split buffered UART
    pub fn new(rx: BufferedUartRx, tx: BufferedUartTx, wait_for_key: bool) -> Self {
        Self {
            rx,
            tx,
            parser: LineParser::new(),
            wait_for_key,
        }
    }

    /// Wait for the next console command
    ///
    /// Cancel-safe: bytes are fed to the parser in the same poll that
    /// reads them.
    pub async fn next_command(&mut self) -> ConsoleCommand {
        let mut buf = [0u8; 16];
        loop {
            match embedded_io_async::Read::read(&mut self.rx, &mut buf).await {
                Ok(n) => {
                    for &byte in &buf[..n] {
                        match self.parser.feed(byte) {
                            Ok(Some(line)) => match ConsoleCommand::parse(&line) {
                                Ok(cmd) => return cmd,
                                Err(e) => warn!("Console parse error: {:?}", e),
                            },
                            Ok(None) => {}
                            Err(e) => warn!("Console line dropped: {:?}", e),
                        }
                    }
                }
                Err(e) => warn!("Console read error: {:?}", e),
            }
        }
    }

    /// Print a line on the console
    pub fn print(&mut self, text: &str) {
        self.write(text.as_bytes());
        self.write(b"\r\n");
    }

    /// Print a `label value` line
    pub fn print_field(&mut self, label: &str, value: &str) {
        self.write(label.as_bytes());
        self.print(value);
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = embedded_io::Write::write_all(&mut self.tx, bytes) {
            warn!("Console write error: {:?}", e);
        }
    }

    /// Block until any byte arrives, discarding it
    fn wait_for_key_press(&mut self) {
        let mut byte = [0u8; 1];
        loop {
            match embedded_io::Read::read(&mut self.rx, &mut byte) {
                Ok(n) if n > 0 => break,
                Ok(_) => {}
                Err(e) => warn!("Console read error: {:?}", e),
            }
        }
        // Anything typed before the key press is not a command
        if self.parser.is_pending() {
            debug!("Discarding partial console line");
        }
        self.parser.reset();
    }
}

impl FaultSink for Console {
    fn on_fault(&mut self, fault: Fault) {
        self.print(fault.message());

        if self.wait_for_key {
            self.print("Clear the problem, then press any key");
            self.wait_for_key_press();
            info!("Operator acknowledged {}", fault);
        } else {
            block_for(Duration::from_millis(UNATTENDED_PAUSE_MS));
        }
    }
}
