//! Keypad Calculator
//!
//! A button-driven calculator: an entry being typed, at most one pending
//! binary operation, a memory register, a 50-entry history and a dark/light
//! theme. Memory, history and theme survive restarts through a
//! [`storage::KeyValueStore`].
//!
//! - [`core`]: the platform independent state machine
//! - [`storage`]: persistence backends
//! - [`wasm`]: page model, keypad layout and key bindings
//! - [`driver`]: one scenario suite run against every front end
//!
//! # Example
//!
//! ```rust
//! use calcpad::prelude::*;
//!
//! let mut engine = CalculatorEngine::with_store(MemoryStore::new());
//! for command in [
//!     Command::Digit(2),
//!     Command::Operator('+'),
//!     Command::Digit(3),
//!     Command::Operator('*'),
//!     Command::Digit(4),
//!     Command::Equals,
//! ] {
//!     engine.dispatch(command);
//! }
//!
//! // Operations chain left to right
//! assert_eq!(engine.render().display, "20");
//! assert_eq!(engine.history().lines()[0], "5 * 4 = 20");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod driver;
pub mod storage;

/// WASM module - always available for testing
/// (Mock DOM allows testing without actual browser bindings)
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::{
        CalcError, CalcResult, CalculatorEngine, Command, DeferredAction, EngineOptions, Entry,
        Evaluation, History, HistoryEntry, Operation, RenderState, Theme,
    };
    pub use crate::driver::{CalculatorDriver, HeadlessDriver};
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::storage::FileStore;
    pub use crate::storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};
    pub use crate::wasm::{DomElement, DomEvent, MockDom, WasmDriver, WasmKeypad};
}
