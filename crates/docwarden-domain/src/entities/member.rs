use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required_text;
use crate::errors::DomainResult;
use crate::value_objects::{MemberId, OrganizationId};

/// An individual belonging to exactly one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    first_name: String,
    last_name: String,
    organization_id: OrganizationId,
    created_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member under `organization_id`.
    ///
    /// The caller is responsible for checking that the organization is live.
    pub fn create(
        organization_id: OrganizationId,
        first_name: &str,
        last_name: &str,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: MemberId::new(),
            first_name: required_text("first_name", first_name)?,
            last_name: required_text("last_name", last_name)?,
            organization_id,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
