//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// calcpad: keypad calculator with memory, history and theme that persist
#[derive(Parser, Debug)]
#[command(name = "calcpad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML settings file
    #[arg(long, global = true, env = "CALCPAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding calcpad.json
    #[arg(long, global = true, env = "CALCPAD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// How long an error stays on the display, in milliseconds
    #[arg(long, global = true)]
    pub error_recovery_ms: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Press keys or buttons and print the resulting state
    Keys(KeysArgs),

    /// Read keys from stdin line by line
    Repl(ReplArgs),

    /// Show or clear the calculation history
    History(HistoryArgs),

    /// Show or clear the memory register
    Memory(MemoryArgs),

    /// Show or toggle the theme
    Theme(ThemeArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the keys command
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Keyboard keys (`7`, `+`, `Enter`, `Backspace`, `Escape`), button ids
    /// (`memAdd`, `history-item-0`) or runs of single-character keys (`12+3=`)
    #[arg(required = true)]
    pub tokens: Vec<String>,

    /// Run pending deferred actions (error recovery) before printing
    #[arg(long)]
    pub settle: bool,

    /// Print the state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the repl command
#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Print the state as JSON after each line
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Remove every entry
    #[arg(long)]
    pub clear: bool,

    /// Print the stored records as JSON
    #[arg(long, conflicts_with = "clear")]
    pub json: bool,
}

/// Arguments for the memory command
#[derive(Args, Debug)]
pub struct MemoryArgs {
    /// Reset the register to zero
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the theme command
#[derive(Args, Debug)]
pub struct ThemeArgs {
    /// Switch between dark and light
    #[arg(long)]
    pub toggle: bool,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the state file path only
    #[arg(long)]
    pub path: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
