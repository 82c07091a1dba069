//! Engine tuning knobs

use serde::{Deserialize, Serialize};

use docwarden_domain::expiry::{
    ExpiryPolicy, DEFAULT_DASHBOARD_WINDOW_DAYS, DEFAULT_WARNING_WINDOW_DAYS,
};

use crate::errors::ApplicationResult;

/// Windows used to classify documents and build the deadline list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Days ahead of today in which a document counts as expiring soon
    pub warning_window_days: u32,
    /// Days ahead of today covered by the upcoming deadlines list
    pub dashboard_window_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            warning_window_days: DEFAULT_WARNING_WINDOW_DAYS,
            dashboard_window_days: DEFAULT_DASHBOARD_WINDOW_DAYS,
        }
    }
}

impl EngineSettings {
    /// Validated policy for these windows
    pub fn policy(&self) -> ApplicationResult<ExpiryPolicy> {
        Ok(ExpiryPolicy::new(
            self.warning_window_days,
            self.dashboard_window_days,
        )?)
    }
}
