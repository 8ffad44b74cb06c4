//! `keel config`: inspect configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
        ConfigCommands::Show => {
            output.header("Current Configuration:")?;
            output.print(&render(&config)?)?;
        }
    }
    Ok(())
}

fn render(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}
