//! Filament slot identifier

/// Number of filament channels on the unit
pub const SLOT_COUNT: usize = 5;

/// Errors from converting raw values into a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotError {
    /// Argument byte is not an ASCII digit
    NotADigit(u8),
    /// Digit outside 0..=4
    OutOfRange(u8),
}

/// One of the five filament channels (0..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot(u8);

impl Slot {
    /// Slot 0, also the slot the selector homes next to
    pub const ZERO: Slot = Slot(0);

    /// All slots in ascending order
    pub const ALL: [Slot; SLOT_COUNT] = [Slot(0), Slot(1), Slot(2), Slot(3), Slot(4)];

    /// Create a slot from its index
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Create a slot from an ASCII digit as sent on the printer link
    pub fn from_ascii(digit: u8) -> Result<Self, SlotError> {
        if !digit.is_ascii_digit() {
            return Err(SlotError::NotADigit(digit));
        }
        Self::new(digit - b'0').ok_or(SlotError::OutOfRange(digit - b'0'))
    }

    /// Zero-based index into calibration tables
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
