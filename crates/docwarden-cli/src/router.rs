// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::commands::*;
use crate::config::{ConfigManager, DocWardenConfig};
use crate::context::{resolve_caller, AppContext};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// DocWarden - track compliance documents and their expiry dates
#[derive(Parser, Debug)]
#[command(name = "docwarden")]
#[command(bin_name = "docwarden")]
#[command(about = "Track organizations, members and their expiring documents")]
#[command(
    long_about = "DocWarden keeps certificates, permits and other documents for organizations and their members, and tells you which ones are expiring or expired.\n\nQuick start:\n  • docwarden org add --name Acme --address 'Via Roma 1' --city Milano --postal-code 20100\n  • docwarden member add --org <ORG_ID> --first-name Jane --last-name Doe\n  • docwarden doc add --member <MEMBER_ID> --title 'Safety Certificate' --expires 2025-06-30 --file cert.pdf\n  • docwarden deadlines"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subject recorded as the caller (defaults to the OS user)
    #[arg(long = "as", value_name = "SUBJECT", global = true)]
    pub caller: Option<String>,

    /// Configuration file to read instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory overriding storage.data_dir
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage organizations
    #[command(about = "Add, list, inspect and delete organizations")]
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },

    /// Manage members of an organization
    #[command(about = "Add, list and delete members")]
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Manage documents
    #[command(about = "Add, renew, list, download and delete documents")]
    Doc {
        #[command(subcommand)]
        action: DocAction,
    },

    /// Documents due soon
    #[command(about = "List documents expiring within the dashboard window, expired ones first")]
    Deadlines,

    /// Inspect configuration
    #[command(about = "Show the effective configuration")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse arguments, set up logging and run the command
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        let manager = match &cli.config {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        };
        let config = Self::effective_config(&cli, &manager)?;

        crate::logging::init_logging(cli.verbose, cli.quiet, &config.logging.level);
        debug!(config_path = %manager.config_path().display(), "Configuration loaded");

        Self::execute(&cli, &manager, &config).await
    }

    /// Configuration after applying command line overrides
    pub fn effective_config(cli: &Cli, manager: &ConfigManager) -> CliResult<DocWardenConfig> {
        let mut config = manager.load_config()?;
        if let Some(dir) = &cli.data_dir {
            config.storage.data_dir = dir.clone();
        }
        Ok(config)
    }

    /// Execute a parsed command
    pub async fn execute(
        cli: &Cli,
        manager: &ConfigManager,
        config: &DocWardenConfig,
    ) -> CliResult<()> {
        let style = OutputStyle::new(cli.json);

        // Configuration commands never touch storage
        if let Commands::Config { action } = &cli.command {
            return ConfigCommand::new(action.clone(), manager.config_path().to_path_buf())
                .show(config, &style);
        }

        let ctx = AppContext::open(config, resolve_caller(cli.caller.as_deref()), style).await?;

        match &cli.command {
            Commands::Org { action } => OrgCommand::new(action.clone()).execute(&ctx).await,
            Commands::Member { action } => MemberCommand::new(action.clone()).execute(&ctx).await,
            Commands::Doc { action } => DocCommand::new(action.clone()).execute(&ctx).await,
            Commands::Deadlines => DeadlinesCommand.execute(&ctx).await,
            Commands::Config { .. } => Ok(()),
        }
    }
}
