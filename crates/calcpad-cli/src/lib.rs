//! calcpad CLI Library
//!
//! Terminal front end for the keypad calculator. State lives in
//! `<data_dir>/calcpad.json`, so memory, history and theme carry over from
//! one invocation to the next.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;
pub mod session;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, HistoryArgs, KeysArgs, MemoryArgs, ReplArgs, ThemeArgs,
};
pub use config::{CliConfig, ColorChoice, SettingsFile, Verbosity, DEFAULT_DATA_DIR, STATE_FILE};
pub use error::{CliError, CliResult};
pub use output::{render_history, render_state, OutputFormat, Reporter};
pub use session::{open_session, parse_token, parse_tokens, Session};
