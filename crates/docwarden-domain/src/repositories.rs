//! Repository interfaces for record persistence
//!
//! These traits are the entity store contract consumed by the application
//! layer. Implementations live in infrastructure crates; the domain only
//! defines the interfaces.
//!
//! Shared contract for every implementation:
//! - `find_by_id` on a missing id returns `Ok(None)`, not an error
//! - `delete` on a missing id returns `DomainError::EntityNotFound`
//! - listing queries return records in the documented order

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    entities::{Document, DocumentFilePatch, Member, Organization},
    errors::DomainResult,
    value_objects::{DocumentId, DocumentOwner, MemberId, OrganizationId},
};

/// Repository for organization records
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Insert a new organization
    async fn insert_organization(&self, organization: &Organization) -> DomainResult<()>;

    /// Find organization by ID
    async fn find_organization(&self, id: &OrganizationId) -> DomainResult<Option<Organization>>;

    /// All organizations ordered by name
    async fn list_organizations(&self) -> DomainResult<Vec<Organization>>;

    /// Delete organization by ID
    async fn delete_organization(&self, id: &OrganizationId) -> DomainResult<()>;

    /// Check if organization exists
    async fn organization_exists(&self, id: &OrganizationId) -> DomainResult<bool>;
}

/// Repository for member records
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a new member; its organization must exist
    async fn insert_member(&self, member: &Member) -> DomainResult<()>;

    /// Find member by ID
    async fn find_member(&self, id: &MemberId) -> DomainResult<Option<Member>>;

    /// Members of an organization ordered by last name, then first name
    async fn find_members_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Vec<Member>>;

    /// Members belonging to any of the given ids, in no particular order
    async fn find_members(&self, ids: &[MemberId]) -> DomainResult<Vec<Member>>;

    /// Delete member by ID
    async fn delete_member(&self, id: &MemberId) -> DomainResult<()>;

    /// Check if member exists
    async fn member_exists(&self, id: &MemberId) -> DomainResult<bool>;
}

/// Repository for document records
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document; its owner must exist and its file ref be unused
    async fn insert_document(&self, document: &Document) -> DomainResult<()>;

    /// Find document by ID
    async fn find_document(&self, id: &DocumentId) -> DomainResult<Option<Document>>;

    /// Documents of one owner ordered by title
    async fn find_documents_by_owner(&self, owner: &DocumentOwner) -> DomainResult<Vec<Document>>;

    /// Documents of any of the given owners in a single query, ordered by title
    async fn find_documents_by_owners(&self, owners: &[DocumentOwner]) -> DomainResult<Vec<Document>>;

    /// Documents expiring on or before `date`, ascending by expiry date
    async fn find_documents_expiring_on_or_before(
        &self,
        date: NaiveDate,
    ) -> DomainResult<Vec<Document>>;

    /// All documents ordered by title
    async fn list_documents(&self) -> DomainResult<Vec<Document>>;

    /// Atomically replace file ref and expiry date, returning the updated record
    async fn update_document_file(
        &self,
        id: &DocumentId,
        patch: DocumentFilePatch,
    ) -> DomainResult<Document>;

    /// Delete document by ID
    async fn delete_document(&self, id: &DocumentId) -> DomainResult<()>;
}

/// Combined entity store (organizations + members + documents)
///
/// Services that need several record types depend on this trait; focused
/// consumers can depend on a single repository trait instead.
pub trait EntityStore: OrganizationRepository + MemberRepository + DocumentRepository {}

/// Blanket implementation: any type implementing all three repositories is an entity store
impl<T: OrganizationRepository + MemberRepository + DocumentRepository> EntityStore for T {}
