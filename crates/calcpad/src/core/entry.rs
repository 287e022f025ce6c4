//! The in-progress numeric entry
//!
//! An [`Entry`] is the text on the display while the user types. It is kept
//! as text so partial input such as `"5."` survives until it is consumed.

use crate::core::number::{format_number, parse_number};

/// Text shown for an empty entry
pub const ZERO: &str = "0";

/// Current value being typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    text: String,
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

impl Entry {
    /// Creates an entry showing `"0"`
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: ZERO.to_string(),
        }
    }

    /// Creates an entry from arbitrary text
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Creates an entry displaying a number
    #[must_use]
    pub fn from_number(value: f64) -> Self {
        Self {
            text: format_number(value),
        }
    }

    /// Returns the entry text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if the entry already has a decimal point
    #[must_use]
    pub fn has_decimal_point(&self) -> bool {
        self.text.contains('.')
    }

    /// Returns true if a character may be typed into an entry
    #[must_use]
    pub fn accepts(ch: char) -> bool {
        ch.is_ascii_digit() || ch == '.'
    }

    /// Appends a digit or decimal point.
    ///
    /// A lone `"0"` is replaced by a digit, and a second decimal point is
    /// rejected. Returns false if the entry was left unchanged.
    pub fn push(&mut self, ch: char) -> bool {
        if !Self::accepts(ch) {
            return false;
        }
        if self.text == ZERO && ch != '.' {
            self.text = ch.to_string();
            return true;
        }
        if ch == '.' && self.has_decimal_point() {
            return false;
        }
        self.text.push(ch);
        true
    }

    /// Starts a fresh entry with exactly `ch`, which may leave it as `"."`
    pub fn replace(&mut self, ch: char) {
        self.text = ch.to_string();
    }

    /// Drops the last character, falling back to `"0"`
    pub fn delete_last(&mut self) {
        let mut chars = self.text.chars();
        if chars.next_back().is_some() && !chars.as_str().is_empty() {
            self.text = chars.as_str().to_string();
        } else {
            self.clear();
        }
    }

    /// Resets the entry to `"0"`
    pub fn clear(&mut self) {
        self.text = ZERO.to_string();
    }

    /// Shows a number
    pub fn set_number(&mut self, value: f64) {
        self.text = format_number(value);
    }

    /// Numeric value of the entry; NaN when the text is not a number (`"."`)
    #[must_use]
    pub fn value(&self) -> f64 {
        parse_number(&self.text).unwrap_or(f64::NAN)
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn typed(keys: &str) -> Entry {
        let mut entry = Entry::new();
        for ch in keys.chars() {
            entry.push(ch);
        }
        entry
    }

    #[test]
    fn test_entry_new_is_zero() {
        assert_eq!(Entry::new().as_str(), "0");
        assert_eq!(Entry::default().value(), 0.0);
    }

    #[test]
    fn test_leading_zero_collapses() {
        assert_eq!(typed("5").as_str(), "5");
        assert_eq!(typed("05").as_str(), "5");
        assert_eq!(typed("0").as_str(), "0");
    }

    #[test]
    fn test_decimal_point_after_zero_keeps_zero() {
        assert_eq!(typed(".").as_str(), "0.");
        assert_eq!(typed(".5").as_str(), "0.5");
    }

    #[test]
    fn test_second_decimal_point_rejected() {
        let mut entry = typed("1.5");
        assert!(!entry.push('.'));
        assert_eq!(entry.as_str(), "1.5");
    }

    #[test]
    fn test_push_rejects_non_digits() {
        let mut entry = Entry::new();
        assert!(!entry.push('a'));
        assert!(!entry.push('+'));
        assert_eq!(entry.as_str(), "0");
    }

    #[test]
    fn test_replace_allows_lone_point() {
        let mut entry = typed("42");
        entry.replace('.');
        assert_eq!(entry.as_str(), ".");
        assert!(entry.value().is_nan());
    }

    #[test]
    fn test_delete_last() {
        let mut entry = typed("123");
        entry.delete_last();
        assert_eq!(entry.as_str(), "12");
        entry.delete_last();
        entry.delete_last();
        assert_eq!(entry.as_str(), "0");
        entry.delete_last();
        assert_eq!(entry.as_str(), "0");
    }

    #[test]
    fn test_delete_last_on_negative_number() {
        let mut entry = Entry::from_number(-3.0);
        entry.delete_last();
        assert_eq!(entry.as_str(), "-");
        assert!(entry.value().is_nan());
    }

    #[test]
    fn test_set_number_and_value() {
        let mut entry = Entry::new();
        entry.set_number(0.3);
        assert_eq!(entry.as_str(), "0.3");
        assert_eq!(entry.value(), 0.3);
    }

    #[test]
    fn test_partial_entry_value() {
        assert_eq!(typed("5.").value(), 5.0);
    }

    proptest! {
        #[test]
        fn prop_digits_concatenate(first in 1u8..=9, rest in proptest::collection::vec(0u8..=9, 0..12)) {
            let keys: String = std::iter::once(first)
                .chain(rest)
                .map(|d| char::from(b'0' + d))
                .collect();
            let entry = typed(&keys);
            prop_assert_eq!(entry.as_str(), keys.as_str());
        }

        #[test]
        fn prop_delete_drops_exactly_last(digits in "[1-9][0-9]{1,10}") {
            let mut entry = Entry::from_text(&digits);
            entry.delete_last();
            prop_assert_eq!(entry.as_str(), &digits[..digits.len() - 1]);
        }

        #[test]
        fn prop_at_most_one_decimal_point(keys in "[0-9.]{0,16}") {
            let entry = typed(&keys);
            prop_assert!(entry.as_str().matches('.').count() <= 1);
        }
    }
}
