//! Entity store over [`EntityState`] with a pluggable durability backend
//!
//! Reads take a shared lock; writes take the exclusive lock for the whole
//! mutation so referential checks and the write they guard happen atomically.
//! Durable backends apply the mutation to a copy, persist the copy, and only
//! then publish it, so a failed persist leaves the visible state unchanged.
//!
//! Persisting is synchronous file I/O done under the write lock, which blocks
//! the calling runtime thread. The store is meant for one process running one
//! command at a time, as the `docwarden` CLI does; it is not a shared server
//! store.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use docwarden_domain::{
    entities::{Document, DocumentFilePatch, Member, Organization},
    errors::DomainResult,
    repositories::{DocumentRepository, MemberRepository, OrganizationRepository},
    value_objects::{DocumentId, DocumentOwner, MemberId, OrganizationId},
};

use crate::error::PersistenceError;
use crate::state::EntityState;

/// Where committed state goes after each write
pub trait SnapshotBackend: Send + Sync {
    /// Whether `persist` writes anywhere; volatile backends skip the copy
    const DURABLE: bool;

    fn persist(&self, state: &EntityState) -> Result<(), PersistenceError>;
}

/// Entity store parameterised by its durability backend
#[derive(Debug)]
pub struct RecordStore<B> {
    state: RwLock<EntityState>,
    backend: B,
}

impl<B: SnapshotBackend> RecordStore<B> {
    pub(crate) fn with_state(state: EntityState, backend: B) -> Self {
        Self {
            state: RwLock::new(state),
            backend,
        }
    }

    /// Record counts as (organizations, members, documents)
    pub fn counts(&self) -> (usize, usize, usize) {
        self.state.read().counts()
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    fn read<R>(&self, f: impl FnOnce(&EntityState) -> R) -> R {
        f(&self.state.read())
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut EntityState) -> Result<R, PersistenceError>,
    ) -> DomainResult<R> {
        let mut guard = self.state.write();
        if !B::DURABLE {
            return f(&mut guard).map_err(Into::into);
        }

        let mut next = guard.clone();
        let result = f(&mut next)?;
        self.backend.persist(&next)?;
        *guard = next;
        Ok(result)
    }
}

#[async_trait]
impl<B: SnapshotBackend> OrganizationRepository for RecordStore<B> {
    async fn insert_organization(&self, organization: &Organization) -> DomainResult<()> {
        self.write(|state| state.insert_organization(organization))
    }

    async fn find_organization(&self, id: &OrganizationId) -> DomainResult<Option<Organization>> {
        Ok(self.read(|state| state.find_organization(id)))
    }

    async fn list_organizations(&self) -> DomainResult<Vec<Organization>> {
        Ok(self.read(|state| state.list_organizations()))
    }

    async fn delete_organization(&self, id: &OrganizationId) -> DomainResult<()> {
        self.write(|state| state.delete_organization(id))
    }

    async fn organization_exists(&self, id: &OrganizationId) -> DomainResult<bool> {
        Ok(self.read(|state| state.find_organization(id).is_some()))
    }
}

#[async_trait]
impl<B: SnapshotBackend> MemberRepository for RecordStore<B> {
    async fn insert_member(&self, member: &Member) -> DomainResult<()> {
        self.write(|state| state.insert_member(member))
    }

    async fn find_member(&self, id: &MemberId) -> DomainResult<Option<Member>> {
        Ok(self.read(|state| state.find_member(id)))
    }

    async fn find_members_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Vec<Member>> {
        Ok(self.read(|state| state.find_members_by_organization(organization_id)))
    }

    async fn find_members(&self, ids: &[MemberId]) -> DomainResult<Vec<Member>> {
        Ok(self.read(|state| state.find_members(ids)))
    }

    async fn delete_member(&self, id: &MemberId) -> DomainResult<()> {
        self.write(|state| state.delete_member(id))
    }

    async fn member_exists(&self, id: &MemberId) -> DomainResult<bool> {
        Ok(self.read(|state| state.find_member(id).is_some()))
    }
}

#[async_trait]
impl<B: SnapshotBackend> DocumentRepository for RecordStore<B> {
    async fn insert_document(&self, document: &Document) -> DomainResult<()> {
        self.write(|state| state.insert_document(document))
    }

    async fn find_document(&self, id: &DocumentId) -> DomainResult<Option<Document>> {
        Ok(self.read(|state| state.find_document(id)))
    }

    async fn find_documents_by_owner(&self, owner: &DocumentOwner) -> DomainResult<Vec<Document>> {
        Ok(self.read(|state| state.find_documents_by_owner(owner)))
    }

    async fn find_documents_by_owners(
        &self,
        owners: &[DocumentOwner],
    ) -> DomainResult<Vec<Document>> {
        Ok(self.read(|state| state.find_documents_by_owners(owners)))
    }

    async fn find_documents_expiring_on_or_before(
        &self,
        date: NaiveDate,
    ) -> DomainResult<Vec<Document>> {
        Ok(self.read(|state| state.find_documents_expiring_on_or_before(date)))
    }

    async fn list_documents(&self) -> DomainResult<Vec<Document>> {
        Ok(self.read(|state| state.list_documents()))
    }

    async fn update_document_file(
        &self,
        id: &DocumentId,
        patch: DocumentFilePatch,
    ) -> DomainResult<Document> {
        self.write(|state| state.update_document_file(id, patch))
    }

    async fn delete_document(&self, id: &DocumentId) -> DomainResult<()> {
        self.write(|state| state.delete_document(id))
    }
}
