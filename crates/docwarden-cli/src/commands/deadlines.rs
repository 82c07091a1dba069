//! Deadlines command - the dashboard of documents due soon

use docwarden_application::DeadlineDto;

use crate::commands::Command;
use crate::context::AppContext;
use crate::error::CliResult;

pub struct DeadlinesCommand;

/// "in 3 days", "today", "2 days ago"
pub(crate) fn describe_days(days_remaining: i64) -> String {
    match days_remaining {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        d if d > 0 => format!("in {} days", d),
        d => format!("{} days ago", -d),
    }
}

fn owner_label(row: &DeadlineDto) -> String {
    if row.owner_name == row.organization_name {
        row.owner_name.clone()
    } else {
        format!("{} ({})", row.owner_name, row.organization_name)
    }
}

#[async_trait::async_trait]
impl Command for DeadlinesCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let rows = ctx.engine.deadlines.upcoming_deadlines().await?;

        ctx.style.emit(&rows, |style| {
            println!("{}", style.header("Upcoming deadlines"));
            if rows.is_empty() {
                println!("  Nothing due.");
            }
            for row in &rows {
                println!(
                    "  {}  {:<8}  {:<14}  {}  [{}]",
                    row.document.expiry_date,
                    style.status(row.document.status),
                    describe_days(row.days_remaining),
                    row.document.title,
                    owner_label(row)
                );
            }
        })
    }
}
