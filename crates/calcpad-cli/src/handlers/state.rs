//! History, memory and theme command handlers

use calcpad::core::CalculatorEngine;
use calcpad::storage::KeyValueStore;

use crate::commands::{HistoryArgs, MemoryArgs, ThemeArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_history, Reporter};
use crate::session::open_session;

/// Execute the history command
pub fn execute_history(
    config: &CliConfig,
    reporter: &Reporter,
    args: &HistoryArgs,
) -> CliResult<()> {
    let mut session = open_session(config)?;
    if args.clear {
        session.clear_history();
        reporter.success("History cleared");
        return Ok(());
    }
    reporter.line(&history_report(&session, args.json)?)
}

/// Execute the memory command
pub fn execute_memory(config: &CliConfig, reporter: &Reporter, args: &MemoryArgs) -> CliResult<()> {
    let mut session = open_session(config)?;
    reporter.line(&memory_report(&mut session, args.clear))
}

/// Execute the theme command
pub fn execute_theme(config: &CliConfig, reporter: &Reporter, args: &ThemeArgs) -> CliResult<()> {
    let mut session = open_session(config)?;
    reporter.line(&theme_report(&mut session, args.toggle))
}

/// Numbered history lines, or the stored records as JSON
pub fn history_report<S: KeyValueStore>(engine: &CalculatorEngine<S>, json: bool) -> CliResult<String> {
    if json {
        return Ok(engine.history().to_json()?);
    }
    Ok(render_history(&engine.history().lines()))
}

/// Memory indicator text, after clearing when asked
pub fn memory_report<S: KeyValueStore>(engine: &mut CalculatorEngine<S>, clear: bool) -> String {
    if clear {
        engine.memory_clear();
    }
    engine.render().memory
}

/// Theme name, after toggling when asked
pub fn theme_report<S: KeyValueStore>(engine: &mut CalculatorEngine<S>, toggle: bool) -> String {
    if toggle {
        engine.toggle_theme();
    }
    engine.theme().to_string()
}
