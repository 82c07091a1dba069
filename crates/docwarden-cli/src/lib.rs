// DocWarden CLI - command line front end over the document engine

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;

pub use config::{ConfigManager, DocWardenConfig};
pub use error::{CliError, CliResult};
pub use router::{Cli, CommandRouter};
