// Output formatting and styling

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;

use docwarden_domain::expiry::ExpiryStatus;

use crate::error::CliResult;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
    pub json: bool,
}

impl OutputStyle {
    pub fn new(json: bool) -> Self {
        Self {
            use_colors: !json && std::io::stdout().is_terminal(),
            json,
        }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format section header
    pub fn header(&self, msg: &str) -> String {
        if self.use_colors {
            msg.bold().underline().to_string()
        } else {
            msg.to_string()
        }
    }

    /// Status label, red for expired and yellow for expiring soon
    pub fn status(&self, status: ExpiryStatus) -> String {
        let label = match status {
            ExpiryStatus::Ok => "ok",
            ExpiryStatus::ExpiringSoon => "expiring",
            ExpiryStatus::Expired => "EXPIRED",
        };
        if !self.use_colors {
            return label.to_string();
        }
        match status {
            ExpiryStatus::Ok => label.green().to_string(),
            ExpiryStatus::ExpiringSoon => label.yellow().bold().to_string(),
            ExpiryStatus::Expired => label.red().bold().to_string(),
        }
    }

    /// Attention marker for flagged rows
    pub fn flag(&self, flagged: bool) -> String {
        match (flagged, self.use_colors) {
            (false, _) => " ".to_string(),
            (true, true) => "!".red().bold().to_string(),
            (true, false) => "!".to_string(),
        }
    }

    /// Print `value` as pretty JSON in JSON mode, otherwise run `human`
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&Self)) -> CliResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(self);
        }
        Ok(())
    }
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "✗".red().bold(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}
