//! Calculation history
//!
//! A bounded, most-recent-first list of completed calculations. The stored
//! form is a JSON array of `{operandA, operator, operandB, result}` records;
//! older saves held flattened `"a op b = r"` strings, which are still read.

use crate::core::number::{format_number, parse_number};
use crate::core::Operation;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::OnceLock;

/// A single completed calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Left operand
    #[serde(with = "lossless_number")]
    pub operand_a: f64,
    /// The operator that was applied
    #[serde(rename = "operator")]
    pub operation: Operation,
    /// Right operand
    #[serde(with = "lossless_number")]
    pub operand_b: f64,
    /// Rounded result
    #[serde(with = "lossless_number")]
    pub result: f64,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub const fn new(operand_a: f64, operation: Operation, operand_b: f64, result: f64) -> Self {
        Self {
            operand_a,
            operation,
            operand_b,
            result,
        }
    }

    /// Parses the flattened `"a op b = r"` form.
    ///
    /// Operands were saved as typed, so one that is not numeric (a lone
    /// `"."`) loads as NaN. The result must parse.
    #[must_use]
    pub fn parse_legacy(text: &str) -> Option<Self> {
        let captures = legacy_pattern()?.captures(text)?;
        let operation = Operation::from_symbol(captures[2].chars().next()?)?;
        Some(Self {
            operand_a: parse_number(&captures[1]).unwrap_or(f64::NAN),
            operation,
            operand_b: parse_number(&captures[3]).unwrap_or(f64::NAN),
            result: parse_number(&captures[4])?,
        })
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            format_number(self.operand_a),
            self.operation,
            format_number(self.operand_b),
            format_number(self.result)
        )
    }
}

fn legacy_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\s*(\S+)\s+([-+*/%])\s+(\S+)\s+=\s+(\S+)\s*$").ok())
        .as_ref()
}

/// Numbers as JSON numbers when finite, as `"NaN"`/`"Infinity"`/`"-Infinity"`
/// otherwise. Integral values are written without a fraction.
mod lossless_number {
    use crate::core::number::{format_number, parse_number};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Largest integer every f64 represents exactly
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let value = *value;
        if !value.is_finite() {
            return serializer.serialize_str(&format_number(value));
        }
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            #[allow(clippy::cast_possible_truncation)]
            return serializer.serialize_i64(value as i64);
        }
        serializer.serialize_f64(value)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => parse_number(&text)
                .ok_or_else(|| D::Error::custom(format!("not a number: {text:?}"))),
        }
    }
}

/// One element of a stored history array
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Record(HistoryEntry),
    Legacy(String),
    Unknown(serde::de::IgnoredAny),
}

/// Calculation history, newest first
///
/// Recording past capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default maximum history size
    pub const DEFAULT_MAX_ENTRIES: usize = 50;

    /// Creates a new history with default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_ENTRIES)
    }

    /// Creates a history with custom maximum size
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Adds an entry at the front, evicting from the back when full
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.max_entries);
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Clears all history entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns an iterator over the entries (newest first)
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns the entry at the given index (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Flattened `"a op b = r"` lines, newest first
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Serializes the history to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Deserializes history from JSON.
    ///
    /// Accepts structured records and legacy strings in the same array;
    /// elements that are neither are skipped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let stored: Vec<StoredEntry> = serde_json::from_str(json)?;
        let mut history = Self::new();
        for item in stored {
            let entry = match item {
                StoredEntry::Record(entry) => Some(entry),
                StoredEntry::Legacy(text) => {
                    let parsed = HistoryEntry::parse_legacy(&text);
                    if parsed.is_none() {
                        tracing::debug!(entry = %text, "skipping unreadable history entry");
                    }
                    parsed
                }
                StoredEntry::Unknown(_) => None,
            };
            if let Some(entry) = entry {
                if history.entries.len() < history.max_entries {
                    history.entries.push_back(entry);
                }
            }
        }
        Ok(history)
    }
}
