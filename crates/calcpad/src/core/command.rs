//! Input events the engine understands
//!
//! Buttons and keyboard keys both resolve to a [`Command`]; see
//! [`crate::wasm::keypad`] for the mapping.

use serde::{Deserialize, Serialize};

/// A single user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Digit key, always `0..=9`
    Digit(u8),
    /// Decimal point
    Decimal,
    /// Operator symbol (`+ - * / %`, or `.` which appends a point)
    Operator(char),
    /// Evaluate the pending operation
    Equals,
    /// Soft clear: entry only
    Clear,
    /// Clear entry and pending operation
    ClearAll,
    /// Drop the last character of the entry
    Delete,
    /// Show the memory register
    MemoryRecall,
    /// Reset the memory register to 0
    MemoryClear,
    /// Add the entry to the memory register
    MemoryAdd,
    /// Subtract the entry from the memory register
    MemorySubtract,
    /// Load a history result into the entry
    SelectHistory(usize),
    /// Forget every recorded calculation
    ClearHistory,
    /// Switch between dark and light
    ToggleTheme,
}

impl Command {
    /// Builds a digit command; `None` for values above 9
    #[must_use]
    pub const fn digit(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Self::Digit(value))
        } else {
            None
        }
    }

    /// Character typed into the entry by this command, if any
    #[must_use]
    pub fn entry_char(&self) -> Option<char> {
        match *self {
            Self::Digit(d) if d <= 9 => char::from_digit(u32::from(d), 10),
            Self::Decimal => Some('.'),
            _ => None,
        }
    }
}
