//! Keys command handler

use calcpad::core::{CalculatorEngine, Command, RenderState};
use calcpad::storage::KeyValueStore;

use crate::commands::KeysArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{OutputFormat, Reporter};
use crate::session::{open_session, parse_tokens};

/// Execute the keys command
pub fn execute_keys(config: &CliConfig, reporter: &Reporter, args: &KeysArgs) -> CliResult<()> {
    // Reject bad input before touching the state file
    let commands = parse_tokens(&args.tokens)?;
    let mut session = open_session(config)?;
    let state = press(&mut session, &commands, args.settle);
    reporter.state(&state, OutputFormat::from_json_flag(args.json))
}

/// Dispatches `commands` in order and returns the final snapshot
///
/// With `settle`, every pending deferred action runs first, so an error
/// raised by the last command is already recovered in the snapshot.
pub fn press<S: KeyValueStore>(
    engine: &mut CalculatorEngine<S>,
    commands: &[Command],
    settle: bool,
) -> RenderState {
    for &command in commands {
        engine.dispatch(command);
    }
    if settle {
        engine.settle();
    }
    engine.render()
}
