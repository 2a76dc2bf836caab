//! Debug console operations

use filamux_protocol::ConsoleCommand;

use crate::motion::FEED_LOAD;
use crate::slot::Slot;
use crate::traits::{Board, FilamentSensor};

use super::Mmu;

/// Feed distance of the exercise routine
const EXERCISE_FEED_MM: u32 = 100;

/// Dwell at each slot during the exercise routine
const EXERCISE_DWELL_MS: u32 = 5_000;

/// Dwell after each tool change of the soak test
const SOAK_DWELL_MS: u32 = 2_000;

/// Tool sequence of the soak test
const SOAK_SEQUENCE: [Slot; 6] = [
    Slot::ALL[0],
    Slot::ALL[1],
    Slot::ALL[2],
    Slot::ALL[3],
    Slot::ALL[4],
    Slot::ALL[0],
];

/// Snapshot of the digital inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReport {
    pub selector_exit: bool,
    pub selector_endstop: bool,
    pub extruder_entry: bool,
}

impl<B: Board> Mmu<B> {
    /// Read all three inputs
    pub fn sensor_report(&mut self) -> SensorReport {
        SensorReport {
            selector_exit: self.hw.selector_exit.is_triggered(),
            selector_endstop: self.hw.selector_endstop.is_triggered(),
            extruder_entry: self.hw.extruder_entry.is_triggered(),
        }
    }

    /// Home everything, run the feed, then visit each slot in turn
    pub fn exercise(&mut self) {
        info!("Exercise: homing");
        self.home_selector();
        self.home_idler();

        info!("Exercise: feeding {} mm", EXERCISE_FEED_MM);
        let steps = self.config.feed.mm_to_steps(EXERCISE_FEED_MM);
        self.feed(FEED_LOAD, steps, false);

        for slot in Slot::ALL {
            info!("Exercise: slot {}", slot.index());
            self.engage(slot);
            self.selector_go_to(slot);
            self.delay_ms(EXERCISE_DWELL_MS);
        }
        self.park();
    }

    /// Cycle through every slot, then unload and park
    pub fn soak_test(&mut self) {
        info!("Soak test: homing");
        self.home_selector();
        self.home_idler();

        for slot in SOAK_SEQUENCE {
            info!("Soak test: slot {}", slot.index());
            self.select(slot);
            self.delay_ms(SOAK_DWELL_MS);
        }

        self.unload();
        info!("Soak test complete");
    }

    /// Execute a console command
    ///
    /// Returns a sensor snapshot for the report command. Diagnostic
    /// routines are refused unless enabled in the link configuration.
    pub fn console(&mut self, cmd: ConsoleCommand) -> Option<SensorReport> {
        if cmd.is_diagnostic() && !self.config.link.diagnostics {
            warn!("Console command {} disabled", cmd);
            return None;
        }

        match cmd {
            ConsoleCommand::FinishLoad => {
                let loaded = self.finish_load();
                info!("Finish load: {}", loaded);
            }
            ConsoleCommand::ToolChange(arg) => match Slot::from_ascii(arg) {
                Ok(slot) => self.select(slot),
                Err(e) => warn!("Invalid tool change slot: {:?}", e),
            },
            ConsoleCommand::Unload => self.unload(),
            ConsoleCommand::Exercise => self.exercise(),
            ConsoleCommand::SoakTest => self.soak_test(),
            ConsoleCommand::SensorReport => {
                let report = self.sensor_report();
                info!("Sensors: {}", report);
                return Some(report);
            }
            ConsoleCommand::Unknown(op) => warn!("Unknown console command {}", op as char),
        }
        None
    }
}
