//! Controller task
//!
//! Owns the unit and runs one command at a time. Printer commands come
//! through [`COMMAND_CHANNEL`]; console commands are read directly from
//! the console UART held by the fault sink.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use filamux_core::{Mmu, SensorReport};
use filamux_protocol::{ConsoleCommand, PrinterCommand};

use crate::board::Rp2040Board;
use crate::channels::COMMAND_CHANNEL;

/// Controller task - executes printer and console commands
#[embassy_executor::task]
pub async fn controller_task(mut mmu: Mmu<Rp2040Board>, mut tx: BufferedUartTx) {
    info!("Controller task started");

    loop {
        let event = select(
            COMMAND_CHANNEL.receive(),
            mmu.hardware().faults.next_command(),
        )
        .await;

        match event {
            Either::First(cmd) => handle_printer(&mut mmu, &mut tx, cmd).await,
            Either::Second(cmd) => handle_console(&mut mmu, cmd),
        }
    }
}

async fn handle_printer(mmu: &mut Mmu<Rp2040Board>, tx: &mut BufferedUartTx, cmd: PrinterCommand) {
    let Some(response) = mmu.dispatch(cmd) else {
        debug!("No reply to {}", cmd);
        return;
    };

    let encoded = response.encode();
    if let Err(e) = tx.write_all(encoded.as_bytes()).await {
        warn!("Failed to send reply: {:?}", e);
    }
}

fn handle_console(mmu: &mut Mmu<Rp2040Board>, cmd: ConsoleCommand) {
    info!("Console command: {}", cmd);

    if let Some(report) = mmu.console(cmd) {
        print_report(mmu, report);
    }
}

fn print_report(mmu: &mut Mmu<Rp2040Board>, report: SensorReport) {
    let flag = |on: bool| if on { "1" } else { "0" };
    let console = &mut mmu.hardware().faults;
    console.print_field("selector exit: ", flag(report.selector_exit));
    console.print_field("selector endstop: ", flag(report.selector_endstop));
    console.print_field("extruder entry: ", flag(report.extruder_entry));
}
