//! Org command - Manage organizations

use std::collections::HashSet;

use clap::Subcommand;
use serde::Serialize;

use docwarden_application::{
    CascadeSummary, CreateOrganizationCommand, DocumentDto, MemberOverviewDto, OrganizationDto,
};
use docwarden_domain::value_objects::{DocumentOwner, OrganizationId};

use crate::commands::doc::print_documents;
use crate::commands::Command;
use crate::context::AppContext;
use crate::error::CliResult;

/// Org command action
#[derive(Subcommand, Debug, Clone)]
pub enum OrgAction {
    /// Register an organization
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        postal_code: String,
    },

    /// List organizations; `!` marks those needing attention
    List {
        /// Case-insensitive filter on name or city
        #[arg(long)]
        search: Option<String>,
    },

    /// Show an organization with its members and documents
    Show {
        #[arg(value_name = "ORG_ID")]
        id: OrganizationId,
    },

    /// Delete an organization, its members and all their documents
    Delete {
        #[arg(value_name = "ORG_ID")]
        id: OrganizationId,
    },
}

/// Full view printed by `org show`
#[derive(Debug, Serialize)]
struct OrganizationDetail {
    organization: OrganizationDto,
    needs_attention: bool,
    members: Vec<MemberOverviewDto>,
    documents: Vec<DocumentDto>,
}

/// Org command handler
pub struct OrgCommand {
    action: OrgAction,
}

impl OrgCommand {
    pub fn new(action: OrgAction) -> Self {
        Self { action }
    }

    async fn list(&self, ctx: &AppContext, search: Option<&str>) -> CliResult<()> {
        let mut rows = ctx.engine.aggregator.organization_overview().await?;
        if search.is_some() {
            let hits: HashSet<String> = ctx
                .engine
                .registry
                .list_organizations(search)
                .await?
                .into_iter()
                .map(|o| o.id)
                .collect();
            rows.retain(|row| hits.contains(&row.organization.id));
        }

        ctx.style.emit(&rows, |style| {
            if rows.is_empty() {
                println!("No organizations.");
            }
            for row in &rows {
                let org = &row.organization;
                println!(
                    "{} {}  {:<30} {}",
                    style.flag(row.needs_attention()),
                    org.id,
                    org.name,
                    org.city
                );
            }
        })
    }

    async fn show(&self, ctx: &AppContext, id: &OrganizationId) -> CliResult<()> {
        let owner = DocumentOwner::Organization(*id);
        let detail = OrganizationDetail {
            organization: ctx.engine.registry.get_organization(id).await?,
            needs_attention: ctx.engine.aggregator.has_expiring_or_expired(&owner).await?,
            members: ctx.engine.aggregator.member_overview(id).await?,
            documents: ctx.engine.registry.list_documents(&owner).await?,
        };

        ctx.style.emit(&detail, |style| {
            let org = &detail.organization;
            println!("{}", style.header(&org.name));
            println!("  {}, {} {}", org.address, org.postal_code, org.city);
            println!("  id: {}", org.id);
            if detail.needs_attention {
                println!("  {}", style.warning("documents need attention"));
            }

            println!();
            println!("{}", style.header("Members"));
            if detail.members.is_empty() {
                println!("  none");
            }
            for row in &detail.members {
                println!(
                    "{} {}  {}",
                    style.flag(row.has_expiring_documents),
                    row.member.id,
                    row.member.full_name
                );
            }

            println!();
            println!("{}", style.header("Documents"));
            print_documents(style, &detail.documents);
        })
    }
}

#[async_trait::async_trait]
impl Command for OrgCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        match &self.action {
            OrgAction::Add {
                name,
                address,
                city,
                postal_code,
            } => {
                let org = ctx
                    .engine
                    .registry
                    .create_organization(
                        &ctx.caller,
                        CreateOrganizationCommand {
                            name: name.clone(),
                            address: address.clone(),
                            city: city.clone(),
                            postal_code: postal_code.clone(),
                        },
                    )
                    .await?;
                ctx.style.emit(&org, |style| {
                    println!("{}", style.success(&format!("Organization {} added", org.name)));
                    println!("{}", org.id);
                })
            }
            OrgAction::List { search } => self.list(ctx, search.as_deref()).await,
            OrgAction::Show { id } => self.show(ctx, id).await,
            OrgAction::Delete { id } => {
                let summary: CascadeSummary = ctx
                    .engine
                    .lifecycle
                    .delete_organization(&ctx.caller, id)
                    .await?;
                ctx.style.emit(&summary, |style| {
                    println!(
                        "{}",
                        style.success(&format!(
                            "Organization deleted with {} member(s) and {} document(s)",
                            summary.deleted_members.len(),
                            summary.deleted_documents.len()
                        ))
                    );
                })
            }
        }
    }
}
