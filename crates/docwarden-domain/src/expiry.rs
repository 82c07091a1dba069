//! Expiry classification
//!
//! Classification is a pure function of a document's expiry date and the
//! current calendar day. A document is valid up to and including the day
//! *before* its expiry date, so on the expiry date itself it is already
//! `Expired`:
//!
//! ```text
//!   ... today-1 | today | today+1 ... today+W | today+W+1 ...
//!     Expired   |Expired|   ExpiringSoon      |     Ok
//! ```
//!
//! `W` is the warning window (7 days by default). A wider dashboard window
//! (30 days by default) is only used to select upcoming deadlines.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Default number of days before expiry a document is flagged
pub const DEFAULT_WARNING_WINDOW_DAYS: u32 = 7;

/// Default horizon of the upcoming-deadlines view
pub const DEFAULT_DASHBOARD_WINDOW_DAYS: u32 = 30;

/// Derived expiry state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Ok,
    ExpiringSoon,
    Expired,
}

impl ExpiryStatus {
    /// Whether the document needs attention (expiring or expired)
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ExpiryStatus::Ok)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Ok => "ok",
            ExpiryStatus::ExpiringSoon => "expiring_soon",
            ExpiryStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `expiry_date` relative to `today`
pub fn classify(expiry_date: NaiveDate, today: NaiveDate, warning_window_days: u32) -> ExpiryStatus {
    if expiry_date <= today {
        return ExpiryStatus::Expired;
    }
    if expiry_date <= add_days(today, warning_window_days) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Ok
    }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// The two windows used by classification and the deadlines view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryPolicy {
    warning_window_days: u32,
    dashboard_window_days: u32,
}

impl ExpiryPolicy {
    /// Build a policy; the dashboard window must cover the warning window
    pub fn new(warning_window_days: u32, dashboard_window_days: u32) -> DomainResult<Self> {
        if warning_window_days == 0 {
            return Err(DomainError::validation(
                "warning_window_days",
                "must be greater than 0",
            ));
        }
        if dashboard_window_days < warning_window_days {
            return Err(DomainError::validation(
                "dashboard_window_days",
                "must be at least the warning window",
            ));
        }
        Ok(Self {
            warning_window_days,
            dashboard_window_days,
        })
    }

    pub fn warning_window_days(&self) -> u32 {
        self.warning_window_days
    }

    pub fn dashboard_window_days(&self) -> u32 {
        self.dashboard_window_days
    }

    pub fn classify(&self, expiry_date: NaiveDate, today: NaiveDate) -> ExpiryStatus {
        classify(expiry_date, today, self.warning_window_days)
    }

    /// Last expiry date that still counts as expiring soon
    pub fn warning_horizon(&self, today: NaiveDate) -> NaiveDate {
        add_days(today, self.warning_window_days)
    }

    /// Last expiry date shown in the upcoming-deadlines view
    pub fn dashboard_horizon(&self, today: NaiveDate) -> NaiveDate {
        add_days(today, self.dashboard_window_days)
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            warning_window_days: DEFAULT_WARNING_WINDOW_DAYS,
            dashboard_window_days: DEFAULT_DASHBOARD_WINDOW_DAYS,
        }
    }
}
