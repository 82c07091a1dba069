// Configuration inspection

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::{ConfigError, DocWardenConfig};
use crate::error::CliResult;
use crate::output::OutputStyle;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
}

/// Shows configuration without opening storage
pub struct ConfigCommand {
    action: ConfigAction,
    config_path: PathBuf,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction, config_path: PathBuf) -> Self {
        Self {
            action,
            config_path,
        }
    }

    pub fn show(&self, config: &DocWardenConfig, style: &OutputStyle) -> CliResult<()> {
        match self.action {
            ConfigAction::Show => {
                if style.json {
                    return style.emit(config, |_| {});
                }
                let rendered = toml::to_string_pretty(config).map_err(ConfigError::from)?;
                println!("{}", style.header("DocWarden Configuration"));
                println!();
                print!("{}", rendered);
                Ok(())
            }
            ConfigAction::Path => style.emit(&self.config_path, |_| {
                println!("{}", self.config_path.display());
            }),
        }
    }
}
