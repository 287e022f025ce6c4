//! Terminal rendering of calculator state

use calcpad::core::{RenderState, Theme};
use console::{style, Term};
use serde::Serialize;

use crate::error::CliResult;

/// Output format for state snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Picks JSON when the `--json` flag is set
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Writes snapshots and messages to the terminal
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Prints a snapshot in the requested format
    pub fn state(&self, state: &RenderState, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Text => self.line(&render_state(state, self.use_color)),
            OutputFormat::Json => self.json(state),
        }
    }

    /// Prints a value as a single JSON line
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        self.line(&serde_json::to_string(value)?)
    }

    /// Prints a line to stdout
    pub fn line(&self, text: &str) -> CliResult<()> {
        self.out.write_line(text)?;
        Ok(())
    }

    /// Prints a confirmation message, unless quiet
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }
}

/// Text form of a snapshot
///
/// ```text
/// 5 *
/// 4
/// M: 0.00 | dark
/// ```
///
/// The expression line is omitted when nothing is pending.
#[must_use]
pub fn render_state(state: &RenderState, use_color: bool) -> String {
    let mut lines = Vec::with_capacity(3);
    if !state.expression.is_empty() {
        lines.push(paint(&state.expression, use_color, |s| s.dim()));
    }
    let display = if state.error.is_some() {
        paint(&state.display, use_color, |s| s.red().bold())
    } else {
        paint(&state.display, use_color, |s| s.bold())
    };
    lines.push(display);
    lines.push(format!("{} | {}", state.memory, theme_label(state.theme, use_color)));
    lines.join("\n")
}

/// Numbered history listing, newest first
#[must_use]
pub fn render_history(lines: &[String]) -> String {
    if lines.is_empty() {
        return "No calculations yet".to_string();
    }
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{i:>2}  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn theme_label(theme: Theme, use_color: bool) -> String {
    match theme {
        Theme::Dark => paint(theme.as_str(), use_color, |s| s.blue()),
        Theme::Light => paint(theme.as_str(), use_color, |s| s.yellow()),
    }
}

fn paint(
    text: &str,
    use_color: bool,
    f: impl FnOnce(console::StyledObject<&str>) -> console::StyledObject<&str>,
) -> String {
    if use_color {
        f(style(text)).force_styling(true).to_string()
    } else {
        text.to_string()
    }
}
