//! calcpad: keypad calculator in the terminal
//!
//! ## Usage
//!
//! ```bash
//! calcpad keys 2 + 3 '*' 4 Enter     # prints 20
//! calcpad keys 12+3= memAdd --json   # store the result in memory
//! calcpad history                    # newest first
//! calcpad theme --toggle
//! echo "5/0=" | calcpad repl
//! ```

use calcpad_cli::{
    handlers::{execute_config, execute_history, execute_keys, execute_memory, execute_repl, execute_theme},
    Cli, CliConfig, CliResult, Commands, Reporter, SettingsFile, Verbosity,
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_tracing(config.verbosity);
    tracing::debug!(?config, "effective configuration");

    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    match &cli.command {
        Commands::Keys(args) => execute_keys(&config, &reporter, args),
        Commands::Repl(args) => execute_repl(&config, &reporter, args),
        Commands::History(args) => execute_history(&config, &reporter, args),
        Commands::Memory(args) => execute_memory(&config, &reporter, args),
        Commands::Theme(args) => execute_theme(&config, &reporter, args),
        Commands::Config(args) => execute_config(&config, &reporter, args),
    }
}

/// Defaults, then the settings file, then flags and their env fallbacks
fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let mut config = CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into());

    if let Some(path) = &cli.config {
        config = config.with_settings(SettingsFile::load(path)?);
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(ms) = cli.error_recovery_ms {
        config = config.with_error_recovery_ms(ms);
    }
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(verbosity.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}
