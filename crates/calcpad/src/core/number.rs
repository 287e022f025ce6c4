//! Number ↔ text conversion
//!
//! Entries and stored values are kept as text, so every conversion goes
//! through here. Display strings use the shortest round-trip digits with no
//! trailing `.0`, switch to exponent form outside `[1e-6, 1e21)`, and spell
//! non-finite values `NaN`, `Infinity` and `-Infinity`.

/// Formats a number the way it is shown on the display and stored
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        // Also collapses -0
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let exponent_form = format!("{value:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}

/// Extra digits printed when checking whether a value sits exactly on a
/// rounding tie. Any finite double below `1e21` that is not a tie differs
/// from it well before this many places.
const TIE_CHECK_DIGITS: usize = 32;

/// Formats a number with a fixed number of decimals (`3.5` → `"3.50"`)
///
/// Exact ties round away from zero (`0.125` → `"0.13"`). Magnitudes of
/// `1e21` and above fall back to [`format_number`].
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return format_number(value);
    }

    let mut magnitude = value.abs();
    if is_exact_tie(magnitude, decimals) {
        // Formatting breaks ties to even; the next double up rounds away
        magnitude = f64::from_bits(magnitude.to_bits() + 1);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{magnitude:.decimals$}")
}

/// Whether `magnitude` lies exactly halfway between two `decimals`-place values
fn is_exact_tie(magnitude: f64, decimals: usize) -> bool {
    let precision = decimals + TIE_CHECK_DIGITS;
    let text = format!("{magnitude:.precision$}");
    let Some((_, fraction)) = text.split_once('.') else {
        return false;
    };
    let tail = &fraction[decimals..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Parses text into a number, `None` when it is not numeric.
///
/// Accepts everything [`format_number`] produces plus partial entries such as
/// `"5."` and `".5"`.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
