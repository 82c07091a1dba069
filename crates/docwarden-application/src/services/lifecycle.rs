//! Document Lifecycle Application Service
//!
//! Coordinates the entity store and the storage gateway. There is no
//! transaction spanning both, so every operation writes in a fixed order and
//! compensates on failure:
//!
//! - add: upload file, then insert record; on insert failure remove the upload
//! - renew: upload new file, then patch record; on patch failure remove the
//!   new upload, on success remove the old file
//! - delete: remove record, then file
//!
//! A live document therefore always points at a retrievable file. Files can
//! be orphaned when a cleanup step fails; those are logged and never surfaced.
//!
//! Cascading deletes run children one at a time and stop at the first child
//! failure, before the parent record is touched.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use docwarden_domain::{
    entities::{document_file_name, extension_for, Document, DocumentFilePatch, FileUpload},
    expiry::ExpiryPolicy,
    ports::{delete_idempotent, Clock, StorageGateway, SystemClock},
    repositories::EntityStore,
    value_objects::{DocumentId, DocumentOwner, FileRef, MemberId, OrganizationId},
};

use crate::dto::{
    AddDocumentCommand, CascadeSummary, DocumentDownload, DocumentDto, RenewDocumentCommand,
};
use crate::errors::{ApplicationError, ApplicationResult};
use crate::events::{ApplicationEvent, EventPublisher, NoOpEventPublisher};
use crate::identity::CallerIdentity;

fn required_file(file: Option<FileUpload>) -> ApplicationResult<FileUpload> {
    let file = file.ok_or_else(|| ApplicationError::validation("file", "is required"))?;
    file.validate()?;
    Ok(file)
}

/// Fold a failed child deletion into the parent's cascade error
fn cascade_failure(
    entity: &str,
    id: impl ToString,
    mut completed: Vec<String>,
    failed_child: impl ToString,
    cause: ApplicationError,
) -> ApplicationError {
    // A nested cascade already deleted some grandchildren
    if let ApplicationError::CascadeIncomplete {
        completed: nested, ..
    } = &cause
    {
        completed.extend(nested.iter().cloned());
    }
    ApplicationError::CascadeIncomplete {
        entity: entity.to_string(),
        id: id.to_string(),
        completed,
        failed_child: failed_child.to_string(),
        cause: Box::new(cause),
    }
}

/// Document Lifecycle Application Service
pub struct LifecycleManager<S, G>
where
    S: EntityStore,
    G: StorageGateway,
{
    store: Arc<S>,
    storage: Arc<G>,
    clock: Arc<dyn Clock>,
    policy: ExpiryPolicy,
    events: Arc<dyn EventPublisher>,
}

impl<S, G> LifecycleManager<S, G>
where
    S: EntityStore,
    G: StorageGateway,
{
    pub fn new(store: Arc<S>, storage: Arc<G>) -> Self {
        Self {
            store,
            storage,
            clock: Arc::new(SystemClock),
            policy: ExpiryPolicy::default(),
            events: Arc::new(NoOpEventPublisher),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    fn to_dto(&self, document: &Document) -> DocumentDto {
        DocumentDto::from_domain(document, document.status(&self.policy, self.clock.today()))
    }

    async fn owner_is_live(&self, owner: &DocumentOwner) -> ApplicationResult<bool> {
        Ok(match owner {
            DocumentOwner::Organization(id) => self.store.organization_exists(id).await?,
            DocumentOwner::Member(id) => self.store.member_exists(id).await?,
        })
    }

    /// Remove an upload whose record write failed
    async fn discard_upload(&self, file_ref: &FileRef, operation: &'static str) {
        match delete_idempotent(self.storage.as_ref(), file_ref).await {
            Ok(()) => debug!(file_ref = %file_ref, operation, "Compensated upload removed"),
            Err(e) => error!(
                file_ref = %file_ref,
                operation,
                error = %e,
                "Failed to remove upload after record write failed; file orphaned"
            ),
        }
    }

    /// Remove a file no record points at any more
    async fn release_file(&self, file_ref: &FileRef, document_id: &DocumentId) {
        if let Err(e) = delete_idempotent(self.storage.as_ref(), file_ref).await {
            warn!(
                file_ref = %file_ref,
                document_id = %document_id,
                error = %e,
                "Failed to remove superseded file; file orphaned"
            );
        }
    }

    /// Store a file and create its document record
    pub async fn add_document(
        &self,
        caller: &CallerIdentity,
        cmd: AddDocumentCommand,
    ) -> ApplicationResult<DocumentDto> {
        let actor = caller.ensure_authenticated()?;

        let title = cmd.title.trim();
        if title.is_empty() {
            return Err(ApplicationError::validation("title", "is required"));
        }
        let expiry_date = cmd
            .expiry_date
            .ok_or_else(|| ApplicationError::validation("expiry_date", "is required"))?;
        let file = required_file(cmd.file)?;
        if !self.owner_is_live(&cmd.owner).await? {
            return Err(ApplicationError::validation(
                "owner",
                format!("{} does not exist", cmd.owner),
            ));
        }

        let file_ref = self
            .storage
            .put(
                &file.bytes,
                &file.content_type(),
                &file.suggested_name(title, expiry_date),
            )
            .await?;

        let inserted = match Document::create(cmd.owner, title, expiry_date, file_ref.clone()) {
            Ok(document) => self
                .store
                .insert_document(&document)
                .await
                .map(|()| document),
            Err(e) => Err(e),
        };
        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                self.discard_upload(&file_ref, "add_document").await;
                return Err(e.into());
            }
        };

        info!(
            document_id = %document.id(),
            owner = %document.owner(),
            expiry_date = %expiry_date,
            actor,
            "Document added"
        );
        self.events
            .publish(ApplicationEvent::DocumentAdded {
                document_id: document.id(),
                owner: document.owner(),
                expiry_date,
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(self.to_dto(&document))
    }

    /// Replace a document's file and expiry date, keeping its identity
    pub async fn renew_document(
        &self,
        caller: &CallerIdentity,
        cmd: RenewDocumentCommand,
    ) -> ApplicationResult<DocumentDto> {
        let actor = caller.ensure_authenticated()?;

        let expiry_date = cmd
            .new_expiry_date
            .ok_or_else(|| ApplicationError::validation("expiry_date", "is required"))?;
        let file = required_file(cmd.file)?;

        let current = self
            .store
            .find_document(&cmd.document_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Document", cmd.document_id))?;

        let new_ref = self
            .storage
            .put(
                &file.bytes,
                &file.content_type(),
                &file.suggested_name(current.title(), expiry_date),
            )
            .await?;

        let patch = DocumentFilePatch {
            file_ref: new_ref.clone(),
            expiry_date,
        };
        let renewed = match self.store.update_document_file(&cmd.document_id, patch).await {
            Ok(document) => document,
            Err(e) => {
                self.discard_upload(&new_ref, "renew_document").await;
                return Err(e.into());
            }
        };

        if current.file_ref() != renewed.file_ref() {
            self.release_file(current.file_ref(), &current.id()).await;
        }

        info!(
            document_id = %renewed.id(),
            previous_expiry_date = %current.expiry_date(),
            expiry_date = %expiry_date,
            actor,
            "Document renewed"
        );
        self.events
            .publish(ApplicationEvent::DocumentRenewed {
                document_id: renewed.id(),
                previous_expiry_date: current.expiry_date(),
                expiry_date,
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(self.to_dto(&renewed))
    }

    /// Delete a document record and then its file
    pub async fn delete_document(
        &self,
        caller: &CallerIdentity,
        id: &DocumentId,
    ) -> ApplicationResult<()> {
        let actor = caller.ensure_authenticated()?;
        self.remove_document(id, actor).await
    }

    async fn remove_document(&self, id: &DocumentId, actor: &str) -> ApplicationResult<()> {
        let document = self
            .store
            .find_document(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Document", id))?;

        self.store.delete_document(id).await?;
        self.release_file(document.file_ref(), id).await;

        info!(document_id = %id, actor, "Document deleted");
        self.events
            .publish(ApplicationEvent::DocumentDeleted {
                document_id: *id,
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;
        Ok(())
    }

    /// Delete a member after deleting each of their documents
    pub async fn delete_member(
        &self,
        caller: &CallerIdentity,
        id: &MemberId,
    ) -> ApplicationResult<CascadeSummary> {
        let actor = caller.ensure_authenticated()?;
        self.remove_member(id, actor).await
    }

    async fn remove_member(&self, id: &MemberId, actor: &str) -> ApplicationResult<CascadeSummary> {
        if !self.store.member_exists(id).await? {
            return Err(ApplicationError::not_found("Member", id));
        }

        let documents = self
            .store
            .find_documents_by_owner(&DocumentOwner::Member(*id))
            .await?;
        let completed = self
            .remove_documents("Member", &id.to_string(), &documents, Vec::new(), actor)
            .await?;

        if let Err(e) = self.store.delete_member(id).await {
            return Err(cascade_failure("Member", id, completed, id, e.into()));
        }

        info!(member_id = %id, documents = completed.len(), actor, "Member deleted");
        self.events
            .publish(ApplicationEvent::MemberDeleted {
                member_id: *id,
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(CascadeSummary {
            deleted_members: vec![id.to_string()],
            deleted_documents: completed,
        })
    }

    /// Delete documents in order; a child already gone counts as deleted
    async fn remove_documents(
        &self,
        entity: &str,
        parent_id: &str,
        documents: &[Document],
        mut completed: Vec<String>,
        actor: &str,
    ) -> ApplicationResult<Vec<String>> {
        for document in documents {
            match self.remove_document(&document.id(), actor).await {
                Ok(()) => completed.push(document.id().to_string()),
                Err(e) if e.is_not_found() => {
                    debug!(document_id = %document.id(), "Cascade child already deleted");
                    completed.push(document.id().to_string());
                }
                Err(e) => {
                    warn!(
                        document_id = %document.id(),
                        error = %e,
                        "{} cascade stopped",
                        entity
                    );
                    return Err(cascade_failure(
                        entity,
                        parent_id,
                        completed,
                        document.id(),
                        e,
                    ));
                }
            }
        }
        Ok(completed)
    }

    /// Delete an organization after its members (with their documents) and
    /// its own documents
    pub async fn delete_organization(
        &self,
        caller: &CallerIdentity,
        id: &OrganizationId,
    ) -> ApplicationResult<CascadeSummary> {
        let actor = caller.ensure_authenticated()?;

        if !self.store.organization_exists(id).await? {
            return Err(ApplicationError::not_found("Organization", id));
        }

        let mut summary = CascadeSummary::default();
        let mut completed: Vec<String> = Vec::new();

        let members = self.store.find_members_by_organization(id).await?;
        for member in &members {
            match self.remove_member(&member.id(), actor).await {
                Ok(removed) => {
                    completed.extend(removed.deleted_documents.iter().cloned());
                    completed.push(member.id().to_string());
                    summary.absorb(removed);
                }
                Err(e) if e.is_not_found() => completed.push(member.id().to_string()),
                Err(e) => {
                    warn!(member_id = %member.id(), error = %e, "Organization cascade stopped");
                    return Err(cascade_failure("Organization", id, completed, member.id(), e));
                }
            }
        }

        let documents = self
            .store
            .find_documents_by_owner(&DocumentOwner::Organization(*id))
            .await?;
        let before = completed.len();
        let completed = self
            .remove_documents("Organization", &id.to_string(), &documents, completed, actor)
            .await?;
        summary
            .deleted_documents
            .extend(completed[before..].iter().cloned());

        if let Err(e) = self.store.delete_organization(id).await {
            return Err(cascade_failure("Organization", id, completed, id, e.into()));
        }

        info!(
            organization_id = %id,
            members = summary.deleted_members.len(),
            documents = summary.deleted_documents.len(),
            actor,
            "Organization deleted"
        );
        self.events
            .publish(ApplicationEvent::OrganizationDeleted {
                organization_id: *id,
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(summary)
    }

    /// Fetch a document's file with a download name of
    /// `<title>_<expiry>.<ext>`
    pub async fn download_document(
        &self,
        caller: &CallerIdentity,
        id: &DocumentId,
    ) -> ApplicationResult<DocumentDownload> {
        caller.ensure_authenticated()?;

        let document = self
            .store
            .find_document(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Document", id))?;
        let stored = self.storage.get(document.file_ref()).await?;

        let extension = extension_for(&stored.content_type);
        Ok(DocumentDownload {
            file_name: document_file_name(
                document.title(),
                document.expiry_date(),
                extension.as_deref(),
            ),
            content_type: stored.content_type,
            bytes: stored.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use docwarden_domain::{
        entities::{Member, Organization},
        ports::FixedClock,
        repositories::{DocumentRepository, MemberRepository, OrganizationRepository},
    };
    use docwarden_persistence::{InMemoryBlobStore, InMemoryEntityStore};

    use super::*;
    use crate::errors::ErrorKind;
    use crate::events::InMemoryEventPublisher;

    type Manager = LifecycleManager<InMemoryEntityStore, InMemoryBlobStore>;

    struct Fixture {
        store: Arc<InMemoryEntityStore>,
        blobs: Arc<InMemoryBlobStore>,
        events: Arc<InMemoryEventPublisher>,
        manager: Manager,
        org: Organization,
        member: Member,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn in_days(n: u64) -> NaiveDate {
        today().checked_add_days(Days::new(n)).unwrap()
    }

    fn caller() -> CallerIdentity {
        CallerIdentity::new("office@acme.test")
    }

    fn pdf() -> FileUpload {
        FileUpload::new(b"%PDF-1.7".to_vec()).with_content_type("application/pdf")
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryEntityStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let events = Arc::new(InMemoryEventPublisher::new());
        let org = Organization::create("Acme", "Via Roma 1", "Milano", "20100").unwrap();
        store.insert_organization(&org).await.unwrap();
        let member = Member::create(org.id(), "Jane", "Doe").unwrap();
        store.insert_member(&member).await.unwrap();

        let manager = LifecycleManager::new(store.clone(), blobs.clone())
            .with_clock(Arc::new(FixedClock(today())))
            .with_events(events.clone());
        Fixture {
            store,
            blobs,
            events,
            manager,
            org,
            member,
        }
    }

    fn add_cmd(owner: DocumentOwner, title: &str, expiry: NaiveDate) -> AddDocumentCommand {
        AddDocumentCommand {
            owner,
            title: title.into(),
            expiry_date: Some(expiry),
            file: Some(pdf()),
        }
    }

    async fn add(f: &Fixture, owner: DocumentOwner, title: &str, expiry: NaiveDate) -> DocumentId {
        let dto = f
            .manager
            .add_document(&caller(), add_cmd(owner, title, expiry))
            .await
            .unwrap();
        DocumentId::from_string(&dto.id).unwrap()
    }

    #[tokio::test]
    async fn test_add_document_stores_file_and_record() {
        let f = fixture().await;
        let dto = f
            .manager
            .add_document(&caller(), add_cmd(f.member.id().into(), "Safety Certificate", in_days(3)))
            .await
            .unwrap();

        assert_eq!(dto.status.as_str(), "expiring_soon");
        assert!(f.blobs.contains(&FileRef::new(dto.file_ref.clone())));
        assert!(dto.file_ref.ends_with("Safety_Certificate_2025-09-04.pdf"));
        assert_eq!(f.events.event_types(), vec!["DocumentAdded"]);
    }

    #[tokio::test]
    async fn test_add_document_validation_has_no_effect() {
        let f = fixture().await;
        let owner: DocumentOwner = f.org.id().into();

        let mut missing_file = add_cmd(owner, "Permit", in_days(10));
        missing_file.file = None;
        let mut missing_date = add_cmd(owner, "Permit", in_days(10));
        missing_date.expiry_date = None;
        let mut empty_bytes = add_cmd(owner, "Permit", in_days(10));
        empty_bytes.file = Some(FileUpload::new(Vec::new()).with_content_type("application/pdf"));
        let blank_title = add_cmd(owner, "  ", in_days(10));
        let ghost_owner = add_cmd(MemberId::new().into(), "Permit", in_days(10));

        for cmd in [missing_file, missing_date, empty_bytes, blank_title, ghost_owner] {
            let err = f.manager.add_document(&caller(), cmd).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(f.blobs.count(), 0);
        assert_eq!(f.store.counts().2, 0);
    }

    #[tokio::test]
    async fn test_unauthenticated_caller_has_no_effect() {
        let f = fixture().await;
        let err = f
            .manager
            .add_document(
                &CallerIdentity::anonymous(),
                add_cmd(f.org.id().into(), "Permit", in_days(10)),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ApplicationError::Unauthenticated);
        assert_eq!(f.blobs.count(), 0);
    }

    #[tokio::test]
    async fn test_renew_replaces_file_and_date() {
        let f = fixture().await;
        let id = add(&f, f.member.id().into(), "Badge", in_days(3)).await;
        let before = f.store.find_document(&id).await.unwrap().unwrap();

        let dto = f
            .manager
            .renew_document(
                &caller(),
                RenewDocumentCommand {
                    document_id: id,
                    new_expiry_date: Some(in_days(60)),
                    file: Some(pdf()),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.id, id.to_string());
        assert_eq!(dto.expiry_date, in_days(60));
        assert_eq!(dto.status.as_str(), "ok");
        assert_eq!(dto.title, "Badge");
        assert_ne!(dto.file_ref, before.file_ref().as_str());
        assert!(!f.blobs.contains(before.file_ref()));
        assert_eq!(f.blobs.count(), 1);
    }

    #[tokio::test]
    async fn test_renew_missing_document() {
        let f = fixture().await;
        let err = f
            .manager
            .renew_document(
                &caller(),
                RenewDocumentCommand {
                    document_id: DocumentId::new(),
                    new_expiry_date: Some(in_days(60)),
                    file: Some(pdf()),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.blobs.count(), 0);
    }

    #[tokio::test]
    async fn test_delete_document_removes_file() {
        let f = fixture().await;
        let id = add(&f, f.org.id().into(), "Permit", in_days(10)).await;
        f.manager.delete_document(&caller(), &id).await.unwrap();

        assert!(f.store.find_document(&id).await.unwrap().is_none());
        assert_eq!(f.blobs.count(), 0);

        let err = f.manager.delete_document(&caller(), &id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_organization_cascades() {
        let f = fixture().await;
        add(&f, f.member.id().into(), "Badge", in_days(3)).await;
        add(&f, f.member.id().into(), "Licence", in_days(40)).await;
        add(&f, f.org.id().into(), "Permit", in_days(10)).await;

        let summary = f
            .manager
            .delete_organization(&caller(), &f.org.id())
            .await
            .unwrap();

        assert_eq!(summary.deleted_members, vec![f.member.id().to_string()]);
        assert_eq!(summary.deleted_documents.len(), 3);
        assert_eq!(f.store.counts(), (0, 0, 0));
        assert_eq!(f.blobs.count(), 0);
        assert_eq!(
            f.events.event_types().last().copied(),
            Some("OrganizationDeleted")
        );
    }

    #[tokio::test]
    async fn test_download_document() {
        let f = fixture().await;
        let id = add(&f, f.org.id().into(), "Fire Permit", in_days(10)).await;

        let download = f.manager.download_document(&caller(), &id).await.unwrap();
        assert_eq!(download.bytes, b"%PDF-1.7".to_vec());
        assert_eq!(download.content_type, "application/pdf");
        assert_eq!(download.file_name, "Fire_Permit_2025-09-11.pdf");
    }
}
