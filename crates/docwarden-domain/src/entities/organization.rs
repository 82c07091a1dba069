use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required_text;
use crate::errors::DomainResult;
use crate::value_objects::OrganizationId;

/// Root entity: a company whose members and documents are tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: String,
    address: String,
    city: String,
    postal_code: String,
    created_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization
    ///
    /// # Errors
    /// Returns `ValidationError` if any of the fields is blank.
    pub fn create(
        name: &str,
        address: &str,
        city: &str,
        postal_code: &str,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: OrganizationId::new(),
            name: required_text("name", name)?,
            address: required_text("address", address)?,
            city: required_text("city", city)?,
            postal_code: required_text("postal_code", postal_code)?,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> OrganizationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
