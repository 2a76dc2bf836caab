//! Filament path faults
//!
//! A fault never aborts the running command. The sequence that raised
//! it hands it to [`Mmu::recover`](crate::Mmu::recover), which releases
//! the filament, waits for the operator, re-engages and lets the
//! sequence retry.

mod recovery;

/// Conditions a sequence cannot resolve on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Filament never reached the selector exit sensor
    NotAtSelectorExit,
    /// Unload stalled while the extruder switch still sees filament
    StuckInExtruder,
    /// Unload stalled between the extruder and the selector
    StuckBetweenStages,
    /// Extruder switch reports filament before anything was fed to it
    ExtruderSwitchStuck,
    /// Filament never reached the extruder switch
    NotAtExtruder,
    /// Selector asked to move with filament still inside it
    FilamentInSelector,
}

impl Fault {
    /// Operator-facing description
    pub fn message(&self) -> &'static str {
        match self {
            Fault::NotAtSelectorExit => {
                "filament not detected at the selector exit, check the selector head"
            }
            Fault::StuckInExtruder => "unload stalled, filament still held in the extruder head",
            Fault::StuckBetweenStages => {
                "unload stalled, filament stuck between the extruder and the selector"
            }
            Fault::ExtruderSwitchStuck => {
                "extruder switch active before loading, switch stuck or debris in the path"
            }
            Fault::NotAtExtruder => {
                "filament not detected at the extruder switch, check the tube for binding"
            }
            Fault::FilamentInSelector => {
                "filament present between selector and extruder, unload before selecting"
            }
        }
    }
}
