//! Command handlers - extracted from main.rs for testability
//!
//! Each handler pairs an `execute_*` entry point, which opens the state file
//! and prints, with a pure function over any engine that tests drive
//! directly.

pub mod config;
pub mod keys;
pub mod repl;
pub mod state;

pub use config::execute_config;
pub use keys::{execute_keys, press};
pub use repl::{execute_repl, run_repl};
pub use state::{execute_history, execute_memory, execute_theme};
