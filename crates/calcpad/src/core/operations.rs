//! Binary arithmetic for the pending operation
//!
//! Modulo follows Rust's `f64 %`: a truncated remainder whose sign follows the
//! dividend, so `-7 % 3 == -1`. Only division reports an error for a zero
//! divisor; `x % 0` is NaN.

use crate::core::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};

/// Scale used to suppress binary floating-point noise (8 decimal places)
const ROUNDING_SCALE: f64 = 100_000_000.0;

/// Type-safe operation enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Addition (+)
    #[serde(rename = "+")]
    Add,
    /// Subtraction (-)
    #[serde(rename = "-")]
    Subtract,
    /// Multiplication (*)
    #[serde(rename = "*")]
    Multiply,
    /// Division (/)
    #[serde(rename = "/")]
    Divide,
    /// Modulo (%)
    #[serde(rename = "%")]
    Modulo,
}

impl Operation {
    /// All operations, in keypad order
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
    ];

    /// Returns the operator symbol for display
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }

    /// Parses an operator symbol
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '%' => Some(Self::Modulo),
            _ => None,
        }
    }

    /// Short lowercase name, used for element ids (`op-add`)
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
        }
    }

    /// Applies the operation to `a` and `b` without rounding
    pub fn apply(self, a: f64, b: f64) -> CalcResult<f64> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(a / b)
            }
            Self::Modulo => Ok(a % b),
        }
    }

    /// Applies the operation and rounds the result to 8 decimal places
    pub fn evaluate(self, a: f64, b: f64) -> CalcResult<f64> {
        self.apply(a, b).map(round_result)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rounds to 8 decimal places, ties toward positive infinity.
///
/// Non-finite values pass through unchanged.
#[must_use]
pub fn round_result(value: f64) -> f64 {
    let scaled = value * ROUNDING_SCALE;
    let mut rounded = scaled.round();
    // f64::round breaks ties away from zero; negative ties go up instead
    if scaled < 0.0 && scaled - rounded == 0.5 {
        rounded += 1.0;
    }
    rounded / ROUNDING_SCALE
}
