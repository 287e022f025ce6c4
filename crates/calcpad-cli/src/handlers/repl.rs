//! Repl command handler
//!
//! Each stdin line is a whitespace-separated list of tokens. Before a line is
//! applied the engine's clock moves forward by the wall time since the
//! previous line, so an error typed on one line has recovered if the user
//! waits long enough before the next.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use calcpad::core::CalculatorEngine;
use calcpad::storage::KeyValueStore;
use tracing::debug;

use crate::commands::ReplArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_state, OutputFormat, Reporter};
use crate::session::{open_session, parse_tokens};

/// Lines that end the session
const EXIT_WORDS: [&str; 2] = ["quit", "exit"];

/// Execute the repl command
pub fn execute_repl(config: &CliConfig, reporter: &Reporter, args: &ReplArgs) -> CliResult<()> {
    let mut session = open_session(config)?;
    let mut last = Instant::now();
    let clock = move || {
        let now = Instant::now();
        let elapsed = now - last;
        last = now;
        elapsed
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let lines = run_repl(
        &mut session,
        stdin.lock(),
        &mut stdout,
        OutputFormat::from_json_flag(args.json),
        reporter.use_color,
        clock,
    )?;
    debug!(lines, "repl finished");
    Ok(())
}

/// Runs the read-eval-print loop until EOF or an exit word
///
/// `elapsed` reports the time since it was last called. Unknown tokens print
/// an error line and leave the state untouched. Returns the number of lines
/// applied.
pub fn run_repl<S, R, W>(
    engine: &mut CalculatorEngine<S>,
    input: R,
    output: &mut W,
    format: OutputFormat,
    use_color: bool,
    mut elapsed: impl FnMut() -> Duration,
) -> CliResult<usize>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    let mut applied = 0;
    for line in input.lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            [word] if EXIT_WORDS.contains(word) => break,
            _ => {}
        }

        engine.advance(elapsed());
        let commands = match parse_tokens(&tokens) {
            Ok(commands) => commands,
            Err(e) => {
                writeln!(output, "error: {e}")?;
                continue;
            }
        };
        for command in commands {
            engine.dispatch(command);
        }
        applied += 1;

        let state = engine.render();
        match format {
            OutputFormat::Text => writeln!(output, "{}", render_state(&state, use_color))?,
            OutputFormat::Json => writeln!(output, "{}", serde_json::to_string(&state)?)?,
        }
    }
    output.flush()?;
    Ok(applied)
}
