//! Idler engagement state machine
//!
//! The idler roller either presses one slot's filament against the feed
//! gear (`Engaged`), sits fully retracted (`Parked`), or is backed off by
//! a small increment so it can re-engage quickly (`QuickDisengaged`).
//!
//! Transitions are pure here; the controller performs the motion. A
//! request that does not fit the current state is either ignored or
//! routed through a safe intermediate, never applied blindly.

/// Idler states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdlerStatus {
    /// Roller retracted, idler and feed motors unpowered
    #[default]
    Parked,
    /// Roller pressing the selected slot, feed motor powered
    Engaged,
    /// Roller backed off a small increment, idler still powered
    QuickDisengaged,
}

/// Requested idler operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdlerEvent {
    Park,
    Engage,
    QuickDisengage,
    QuickReengage,
    PartialDisengage,
    PartialReengage,
}

/// How a request is carried out from the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdlerRoute {
    /// Apply the operation as requested
    Direct,
    /// Park first, then apply
    ParkFirst,
    /// Run a full engage on the selected slot instead
    EngageInstead,
    /// Nothing to do from this state
    Ignore,
}

impl IdlerStatus {
    /// Check if the roller presses filament
    pub fn is_engaged(&self) -> bool {
        matches!(self, IdlerStatus::Engaged)
    }

    /// Decide how `event` is executed from this state
    pub fn route(self, event: IdlerEvent) -> IdlerRoute {
        use IdlerEvent::*;
        use IdlerStatus::*;

        match (self, event) {
            (_, Park) => IdlerRoute::Direct,

            // Positions are defined from park or from another slot only
            (QuickDisengaged, Engage) => IdlerRoute::ParkFirst,
            (_, Engage) => IdlerRoute::Direct,

            (Engaged, QuickDisengage | PartialDisengage) => IdlerRoute::Direct,
            (_, QuickDisengage | PartialDisengage) => IdlerRoute::Ignore,

            (QuickDisengaged, QuickReengage | PartialReengage) => IdlerRoute::Direct,
            (Parked, QuickReengage | PartialReengage) => IdlerRoute::EngageInstead,
            (Engaged, QuickReengage | PartialReengage) => IdlerRoute::Ignore,
        }
    }

    /// State after `event` has been applied directly
    pub fn transition(self, event: IdlerEvent) -> Self {
        use IdlerEvent::*;

        match event {
            Park => IdlerStatus::Parked,
            Engage | QuickReengage | PartialReengage => IdlerStatus::Engaged,
            QuickDisengage | PartialDisengage => IdlerStatus::QuickDisengaged,
        }
    }
}
