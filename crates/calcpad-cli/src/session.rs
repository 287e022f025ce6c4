//! Engine over the on-disk state file, plus input token parsing

use calcpad::core::{CalculatorEngine, Command};
use calcpad::storage::FileStore;
use calcpad::wasm::keypad::command_for_id;
use calcpad::wasm::WasmKeypad;
use tracing::debug;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Engine backed by the configured state file
pub type Session = CalculatorEngine<FileStore>;

/// Opens the state file (creating nothing until the first write)
pub fn open_session(config: &CliConfig) -> CliResult<Session> {
    let path = config.state_path();
    debug!(path = %path.display(), "opening state file");
    let store = FileStore::open(&path)?;
    Ok(CalculatorEngine::new(store, config.engine_options()))
}

/// Resolves one input token into commands
///
/// A token is, in order of preference, a button id, a single keyboard key,
/// or a run of single-character keys such as `12+3=`.
pub fn parse_token(token: &str) -> CliResult<Vec<Command>> {
    if let Some(command) = command_for_id(token) {
        return Ok(vec![command]);
    }
    if let Some(binding) = WasmKeypad::key_to_binding(token) {
        return Ok(vec![binding.command]);
    }
    token
        .chars()
        .map(|ch| {
            WasmKeypad::key_to_binding(ch.encode_utf8(&mut [0; 4]))
                .map(|binding| binding.command)
                .ok_or_else(|| CliError::invalid_argument(format!("unknown key {ch:?} in {token:?}")))
        })
        .collect()
}

/// Resolves every token, failing on the first unknown one
pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> CliResult<Vec<Command>> {
    let mut commands = Vec::new();
    for token in tokens {
        commands.extend(parse_token(token.as_ref())?);
    }
    Ok(commands)
}
