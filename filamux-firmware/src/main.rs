//! Filamux - Filament Selector Firmware
//!
//! Main firmware binary for RP2040-based filament selectors. The
//! printer talks to the unit on UART0; an operator console sits on
//! UART1. Pin assignment and calibration come from `mmu.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::Write;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use filamux_core::{MmuConfig, Mmu};
use filamux_protocol::START_ANNOUNCEMENT;

use crate::board::{build_hardware, PinBank};
use crate::channels::LINK_ACTIVE;
use crate::config::parse_config;
use crate::console::Console;

mod board;
mod channels;
mod config;
mod console;
mod tasks;

/// Embedded default configuration (compiled into firmware)
/// Edit mmu.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../mmu.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static buffers for the printer and console UARTs
static PRINTER_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static PRINTER_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CONSOLE_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static CONSOLE_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Filamux firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Configuration loaded: fw {} build {}, diagnostics {}",
        config.link.fw_version, config.link.build_number, config.link.diagnostics
    );

    // Printer link on UART0 (GPIO0 TX, GPIO1 RX), 115200 baud default
    let printer = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let printer = printer.into_buffered(
        Irqs,
        PRINTER_TX_BUF.init([0; 64]),
        PRINTER_RX_BUF.init([0; 64]),
    );
    let (mut printer_tx, printer_rx) = printer.split();

    // Operator console on UART1 (GPIO8 TX, GPIO9 RX)
    let console = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, UartConfig::default());
    let console = console.into_buffered(
        Irqs,
        CONSOLE_TX_BUF.init([0; 256]),
        CONSOLE_RX_BUF.init([0; 64]),
    );
    let (console_tx, console_rx) = console.split();
    let console = Console::new(console_rx, console_tx, config.link.console_ack);
    info!("UARTs initialized");

    // Everything except the UART pins is assigned from the config
    let mut bank = PinBank::new([
        None,
        None,
        Some(p.PIN_2.into()),
        Some(p.PIN_3.into()),
        Some(p.PIN_4.into()),
        Some(p.PIN_5.into()),
        Some(p.PIN_6.into()),
        Some(p.PIN_7.into()),
        None,
        None,
        Some(p.PIN_10.into()),
        Some(p.PIN_11.into()),
        Some(p.PIN_12.into()),
        Some(p.PIN_13.into()),
        Some(p.PIN_14.into()),
        Some(p.PIN_15.into()),
        Some(p.PIN_16.into()),
        Some(p.PIN_17.into()),
        Some(p.PIN_18.into()),
        Some(p.PIN_19.into()),
        Some(p.PIN_20.into()),
        Some(p.PIN_21.into()),
        Some(p.PIN_22.into()),
        Some(p.PIN_23.into()),
        Some(p.PIN_24.into()),
        Some(p.PIN_25.into()),
        Some(p.PIN_26.into()),
        Some(p.PIN_27.into()),
        Some(p.PIN_28.into()),
        Some(p.PIN_29.into()),
    ]);

    let timings = [config.selector.timing, config.idler.timing, config.feed.timing];
    let hw = match build_hardware(&mut bank, &config.pins, timings, console) {
        Ok(hw) => hw,
        Err(e) => defmt::panic!("Pin assignment failed: {:?}", e),
    };
    info!("Hardware initialized");

    spawner.spawn(tasks::printer_rx_task(printer_rx)).unwrap();

    if let Err(e) = printer_tx.write_all(START_ANNOUNCEMENT).await {
        warn!("Failed to announce start: {:?}", e);
    }
    if let Err(e) = printer_tx.flush().await {
        warn!("Failed to flush start: {:?}", e);
    }

    wait_for_printer(config.link.wait_s).await;

    let mut mmu = Mmu::new(hw, config);
    mmu.init();

    spawner.spawn(tasks::controller_task(mmu, printer_tx)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration, falling back to the stock calibration
fn load_config() -> MmuConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}, using defaults", e);
            MmuConfig::default()
        }
    }
}

/// Give the printer up to `wait_s` seconds to say something
///
/// Homing starts regardless; a silent printer is logged, not fatal.
async fn wait_for_printer(wait_s: u32) {
    for second in 0..wait_s {
        match with_timeout(Duration::from_secs(1), LINK_ACTIVE.wait()).await {
            Ok(()) => {
                info!("Printer link active");
                return;
            }
            Err(_) => info!("Waiting for printer ({} s)", second + 1),
        }
    }
    warn!("No data from printer, continuing");
}
