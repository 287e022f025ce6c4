//! Core calculator state machine
//!
//! Everything in here is platform independent: entry composition, binary
//! arithmetic, history, theme, deferred actions and the engine tying them
//! together. Rendering and input wiring live in [`crate::wasm`].

pub mod command;
pub mod engine;
pub mod entry;
pub mod history;
pub mod number;
mod operations;
pub mod scheduler;
pub mod theme;

pub use command::Command;
pub use engine::{CalculatorEngine, EngineOptions, Evaluation, PendingOperation, RenderState};
pub use entry::Entry;
pub use history::{History, HistoryEntry};
pub use operations::{round_result, Operation};
pub use scheduler::{DeferredAction, Scheduler};
pub use theme::Theme;

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Calculator error types
///
/// Division by zero is the only failure the arithmetic can report; every
/// other transition of the engine is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Divide operator with a zero right operand
    #[error("Division by zero")]
    DivisionByZero,
}
