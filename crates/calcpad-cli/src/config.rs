//! CLI configuration
//!
//! Effective settings come from three layers, lowest first: built-in
//! defaults, an optional YAML settings file, then command-line flags (which
//! include their environment fallbacks).

use std::path::{Path, PathBuf};
use std::time::Duration;

use calcpad::core::EngineOptions;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Name of the state file inside the data directory
pub const STATE_FILE: &str = "calcpad.json";

/// Data directory used when nothing else names one
pub const DEFAULT_DATA_DIR: &str = ".calcpad";

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Maps `-q` and the `-v` count to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default log filter when `RUST_LOG` is not set
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

/// Keys accepted in the YAML settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Directory holding the state file
    pub data_dir: Option<PathBuf>,
    /// Error display time in milliseconds
    pub error_recovery_ms: Option<u64>,
    /// Loader display time in milliseconds
    pub loader_delay_ms: Option<u64>,
}

impl SettingsFile {
    /// Parses settings from YAML text
    pub fn parse(yaml: &str) -> CliResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Reads and parses a settings file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Directory holding the state file
    pub data_dir: PathBuf,
    /// Error display time in milliseconds
    pub error_recovery_ms: u64,
    /// Loader display time in milliseconds
    pub loader_delay_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        let engine = EngineOptions::default();
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            error_recovery_ms: duration_ms(engine.error_recovery_delay),
            loader_delay_ms: duration_ms(engine.loader_delay),
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the data directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the error display time
    #[must_use]
    pub const fn with_error_recovery_ms(mut self, ms: u64) -> Self {
        self.error_recovery_ms = ms;
        self
    }

    /// Set the loader display time
    #[must_use]
    pub const fn with_loader_delay_ms(mut self, ms: u64) -> Self {
        self.loader_delay_ms = ms;
        self
    }

    /// Overlays whatever the settings file names
    #[must_use]
    pub fn with_settings(mut self, settings: SettingsFile) -> Self {
        if let Some(dir) = settings.data_dir {
            self.data_dir = dir;
        }
        if let Some(ms) = settings.error_recovery_ms {
            self.error_recovery_ms = ms;
        }
        if let Some(ms) = settings.loader_delay_ms {
            self.loader_delay_ms = ms;
        }
        self
    }

    /// Path of the state file
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }

    /// Engine tuning derived from this configuration
    #[must_use]
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::default()
            .with_error_recovery_delay(Duration::from_millis(self.error_recovery_ms))
            .with_loader_delay(Duration::from_millis(self.loader_delay_ms))
    }

    /// Renders the configuration as YAML, in the settings file's shape
    pub fn to_yaml(&self) -> CliResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
