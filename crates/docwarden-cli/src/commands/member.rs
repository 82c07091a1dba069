//! Member command - Manage members of an organization

use clap::Subcommand;

use docwarden_application::CreateMemberCommand;
use docwarden_domain::value_objects::{MemberId, OrganizationId};

use crate::commands::Command;
use crate::context::AppContext;
use crate::error::CliResult;

/// Member command action
#[derive(Subcommand, Debug, Clone)]
pub enum MemberAction {
    /// Register a member of an organization
    Add {
        #[arg(long, value_name = "ORG_ID")]
        org: OrganizationId,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// List an organization's members; `!` marks those needing attention
    List {
        #[arg(long, value_name = "ORG_ID")]
        org: OrganizationId,
        /// Case-insensitive filter on first or last name
        #[arg(long)]
        search: Option<String>,
    },

    /// Delete a member and all their documents
    Delete {
        #[arg(value_name = "MEMBER_ID")]
        id: MemberId,
    },
}

/// Member command handler
pub struct MemberCommand {
    action: MemberAction,
}

impl MemberCommand {
    pub fn new(action: MemberAction) -> Self {
        Self { action }
    }
}

#[async_trait::async_trait]
impl Command for MemberCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        match &self.action {
            MemberAction::Add {
                org,
                first_name,
                last_name,
            } => {
                let member = ctx
                    .engine
                    .registry
                    .create_member(
                        &ctx.caller,
                        CreateMemberCommand {
                            organization_id: *org,
                            first_name: first_name.clone(),
                            last_name: last_name.clone(),
                        },
                    )
                    .await?;
                ctx.style.emit(&member, |style| {
                    println!(
                        "{}",
                        style.success(&format!("Member {} added", member.full_name))
                    );
                    println!("{}", member.id);
                })
            }
            MemberAction::List { org, search } => {
                let mut rows = ctx.engine.aggregator.member_overview(org).await?;
                if search.is_some() {
                    let hits: Vec<String> = ctx
                        .engine
                        .registry
                        .list_members(org, search.as_deref())
                        .await?
                        .into_iter()
                        .map(|m| m.id)
                        .collect();
                    rows.retain(|row| hits.contains(&row.member.id));
                }

                ctx.style.emit(&rows, |style| {
                    if rows.is_empty() {
                        println!("No members.");
                    }
                    for row in &rows {
                        println!(
                            "{} {}  {}",
                            style.flag(row.has_expiring_documents),
                            row.member.id,
                            row.member.full_name
                        );
                    }
                })
            }
            MemberAction::Delete { id } => {
                let summary = ctx.engine.lifecycle.delete_member(&ctx.caller, id).await?;
                ctx.style.emit(&summary, |style| {
                    println!(
                        "{}",
                        style.success(&format!(
                            "Member deleted with {} document(s)",
                            summary.deleted_documents.len()
                        ))
                    );
                })
            }
        }
    }
}
