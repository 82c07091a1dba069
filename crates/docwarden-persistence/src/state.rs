//! Record state shared by the entity store backends
//!
//! All referential rules live here so every backend enforces them the same
//! way: owners must exist on insert, parents cannot be removed while they still
//! own records, and a file ref belongs to at most one document.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use docwarden_domain::{
    entities::{Document, DocumentFilePatch, Member, Organization},
    value_objects::{DocumentId, DocumentOwner, FileRef, MemberId, OrganizationId},
};

use crate::error::PersistenceError;

type Result<T> = std::result::Result<T, PersistenceError>;

/// In-memory view of every record
#[derive(Debug, Clone, Default)]
pub struct EntityState {
    organizations: HashMap<OrganizationId, Organization>,
    members: HashMap<MemberId, Member>,
    documents: HashMap<DocumentId, Document>,
}

/// Serialized form of [`EntityState`]
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

fn sort_key(text: &str) -> String {
    text.to_lowercase()
}

impl EntityState {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            organizations: snapshot
                .organizations
                .into_iter()
                .map(|o| (o.id(), o))
                .collect(),
            members: snapshot.members.into_iter().map(|m| (m.id(), m)).collect(),
            documents: snapshot.documents.into_iter().map(|d| (d.id(), d)).collect(),
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            organizations: self.organizations.values().cloned().collect(),
            members: self.members.values().cloned().collect(),
            documents: self.documents.values().cloned().collect(),
        };
        // Stable file contents between writes
        snapshot.organizations.sort_by_key(|o| o.id());
        snapshot.members.sort_by_key(|m| m.id());
        snapshot.documents.sort_by_key(|d| d.id());
        snapshot
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.organizations.len(),
            self.members.len(),
            self.documents.len(),
        )
    }

    // === Organizations ===

    pub fn insert_organization(&mut self, organization: &Organization) -> Result<()> {
        if self.organizations.contains_key(&organization.id()) {
            return Err(PersistenceError::constraint(format!(
                "organization {} already exists",
                organization.id()
            )));
        }
        self.organizations
            .insert(organization.id(), organization.clone());
        Ok(())
    }

    pub fn find_organization(&self, id: &OrganizationId) -> Option<Organization> {
        self.organizations.get(id).cloned()
    }

    pub fn list_organizations(&self) -> Vec<Organization> {
        let mut all: Vec<Organization> = self.organizations.values().cloned().collect();
        all.sort_by(|a, b| {
            sort_key(a.name())
                .cmp(&sort_key(b.name()))
                .then_with(|| a.id().cmp(&b.id()))
        });
        all
    }

    pub fn delete_organization(&mut self, id: &OrganizationId) -> Result<()> {
        if !self.organizations.contains_key(id) {
            return Err(PersistenceError::not_found("Organization", id));
        }
        let owner = DocumentOwner::Organization(*id);
        let still_owns = self.members.values().any(|m| m.organization_id() == *id)
            || self.documents.values().any(|d| d.owner() == owner);
        if still_owns {
            return Err(PersistenceError::constraint(format!(
                "organization {} still has members or documents",
                id
            )));
        }
        self.organizations.remove(id);
        Ok(())
    }

    // === Members ===

    pub fn insert_member(&mut self, member: &Member) -> Result<()> {
        if self.members.contains_key(&member.id()) {
            return Err(PersistenceError::constraint(format!(
                "member {} already exists",
                member.id()
            )));
        }
        if !self.organizations.contains_key(&member.organization_id()) {
            return Err(PersistenceError::not_found(
                "Organization",
                member.organization_id(),
            ));
        }
        self.members.insert(member.id(), member.clone());
        Ok(())
    }

    pub fn find_member(&self, id: &MemberId) -> Option<Member> {
        self.members.get(id).cloned()
    }

    pub fn find_members_by_organization(&self, organization_id: &OrganizationId) -> Vec<Member> {
        let mut members: Vec<Member> = self
            .members
            .values()
            .filter(|m| m.organization_id() == *organization_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| {
            sort_key(a.last_name())
                .cmp(&sort_key(b.last_name()))
                .then_with(|| sort_key(a.first_name()).cmp(&sort_key(b.first_name())))
                .then_with(|| a.id().cmp(&b.id()))
        });
        members
    }

    pub fn find_members(&self, ids: &[MemberId]) -> Vec<Member> {
        ids.iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| self.members.get(id).cloned())
            .collect()
    }

    pub fn delete_member(&mut self, id: &MemberId) -> Result<()> {
        if !self.members.contains_key(id) {
            return Err(PersistenceError::not_found("Member", id));
        }
        let owner = DocumentOwner::Member(*id);
        if self.documents.values().any(|d| d.owner() == owner) {
            return Err(PersistenceError::constraint(format!(
                "member {} still owns documents",
                id
            )));
        }
        self.members.remove(id);
        Ok(())
    }

    // === Documents ===

    fn owner_exists(&self, owner: &DocumentOwner) -> bool {
        match owner {
            DocumentOwner::Organization(id) => self.organizations.contains_key(id),
            DocumentOwner::Member(id) => self.members.contains_key(id),
        }
    }

    fn file_ref_taken(&self, file_ref: &FileRef, except: Option<&DocumentId>) -> bool {
        self.documents
            .values()
            .any(|d| d.file_ref() == file_ref && Some(&d.id()) != except)
    }

    pub fn insert_document(&mut self, document: &Document) -> Result<()> {
        if self.documents.contains_key(&document.id()) {
            return Err(PersistenceError::constraint(format!(
                "document {} already exists",
                document.id()
            )));
        }
        let owner = document.owner();
        if !self.owner_exists(&owner) {
            return Err(PersistenceError::not_found(
                owner.kind().entity_name(),
                owner.id(),
            ));
        }
        if self.file_ref_taken(document.file_ref(), None) {
            return Err(PersistenceError::constraint(format!(
                "file ref {} is already used by another document",
                document.file_ref()
            )));
        }
        self.documents.insert(document.id(), document.clone());
        Ok(())
    }

    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.documents.get(id).cloned()
    }

    fn sorted_by_title(mut documents: Vec<Document>) -> Vec<Document> {
        documents.sort_by(|a, b| {
            sort_key(a.title())
                .cmp(&sort_key(b.title()))
                .then_with(|| a.id().cmp(&b.id()))
        });
        documents
    }

    pub fn find_documents_by_owner(&self, owner: &DocumentOwner) -> Vec<Document> {
        Self::sorted_by_title(
            self.documents
                .values()
                .filter(|d| d.owner() == *owner)
                .cloned()
                .collect(),
        )
    }

    pub fn find_documents_by_owners(&self, owners: &[DocumentOwner]) -> Vec<Document> {
        let wanted: HashSet<&DocumentOwner> = owners.iter().collect();
        Self::sorted_by_title(
            self.documents
                .values()
                .filter(|d| wanted.contains(&d.owner()))
                .cloned()
                .collect(),
        )
    }

    pub fn find_documents_expiring_on_or_before(&self, date: NaiveDate) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .values()
            .filter(|d| d.expiry_date() <= date)
            .cloned()
            .collect();
        documents.sort_by(|a, b| {
            a.expiry_date()
                .cmp(&b.expiry_date())
                .then_with(|| sort_key(a.title()).cmp(&sort_key(b.title())))
                .then_with(|| a.id().cmp(&b.id()))
        });
        documents
    }

    pub fn list_documents(&self) -> Vec<Document> {
        Self::sorted_by_title(self.documents.values().cloned().collect())
    }

    pub fn update_document_file(
        &mut self,
        id: &DocumentId,
        patch: DocumentFilePatch,
    ) -> Result<Document> {
        if !self.documents.contains_key(id) {
            return Err(PersistenceError::not_found("Document", id));
        }
        if self.file_ref_taken(&patch.file_ref, Some(id)) {
            return Err(PersistenceError::constraint(format!(
                "file ref {} is already used by another document",
                patch.file_ref
            )));
        }
        let document = self
            .documents
            .get_mut(id)
            .ok_or_else(|| PersistenceError::not_found("Document", id))?;
        document.apply_file_patch(patch);
        Ok(document.clone())
    }

    pub fn delete_document(&mut self, id: &DocumentId) -> Result<()> {
        self.documents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::not_found("Document", id))
    }
}
