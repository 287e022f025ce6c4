//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;

/// Execute the config command
pub fn execute_config(config: &CliConfig, reporter: &Reporter, args: &ConfigArgs) -> CliResult<()> {
    reporter.line(&config_report(config, args.path)?)
}

/// Effective configuration as YAML, or just the state file path
pub fn config_report(config: &CliConfig, path_only: bool) -> CliResult<String> {
    if path_only {
        return Ok(config.state_path().display().to_string());
    }
    Ok(config.to_yaml()?.trim_end().to_string())
}
