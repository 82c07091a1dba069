// Command handlers for the docwarden CLI

pub mod config;
pub mod deadlines;
pub mod doc;
pub mod member;
pub mod org;

pub use config::{ConfigAction, ConfigCommand};
pub use deadlines::DeadlinesCommand;
pub use doc::{DocAction, DocCommand, OwnerArgs};
pub use member::{MemberAction, MemberCommand};
pub use org::{OrgAction, OrgCommand};

use crate::context::AppContext;
use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self, ctx: &AppContext) -> CliResult<()>;
}
