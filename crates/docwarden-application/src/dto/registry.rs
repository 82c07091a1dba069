//! Organization and member DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docwarden_domain::entities::{Member, Organization};
use docwarden_domain::value_objects::OrganizationId;

/// Command to register an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationCommand {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// Command to register a member of an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberCommand {
    pub organization_id: OrganizationId,
    pub first_name: String,
    pub last_name: String,
}

/// Organization DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
}

impl OrganizationDto {
    /// Create from domain entity
    pub fn from_domain(organization: &Organization) -> Self {
        Self {
            id: organization.id().to_string(),
            name: organization.name().to_string(),
            address: organization.address().to_string(),
            city: organization.city().to_string(),
            postal_code: organization.postal_code().to_string(),
            created_at: organization.created_at(),
        }
    }
}

/// Organization row of the overview, with its warning flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationOverviewDto {
    pub organization: OrganizationDto,
    /// A document owned directly by the organization is expiring or expired
    pub has_expiring_documents: bool,
    /// A document of one of its members is expiring or expired
    pub has_expiring_member_documents: bool,
}

impl OrganizationOverviewDto {
    pub fn needs_attention(&self) -> bool {
        self.has_expiring_documents || self.has_expiring_member_documents
    }
}

/// Member DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: String,
    pub organization_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl MemberDto {
    /// Create from domain entity
    pub fn from_domain(member: &Member) -> Self {
        Self {
            id: member.id().to_string(),
            organization_id: member.organization_id().to_string(),
            first_name: member.first_name().to_string(),
            last_name: member.last_name().to_string(),
            full_name: member.full_name(),
            created_at: member.created_at(),
        }
    }
}

/// Member row of an organization's overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberOverviewDto {
    pub member: MemberDto,
    pub has_expiring_documents: bool,
}
