//! Lifecycle failure-path tests
//!
//! The entity store and storage gateway are wrapped so individual calls can
//! be made to fail, exercising compensation, orphan logging and cascade
//! abort behaviour.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use parking_lot::Mutex;

use docwarden_application::{
    AddDocumentCommand, ApplicationError, CallerIdentity, ErrorKind, LifecycleManager,
    RenewDocumentCommand,
};
use docwarden_domain::{
    entities::{Document, DocumentFilePatch, FileUpload, Member, Organization},
    errors::{DomainError, DomainResult},
    ports::{FixedClock, StorageGateway, StoredFile},
    repositories::{DocumentRepository, MemberRepository, OrganizationRepository},
    value_objects::{DocumentId, DocumentOwner, FileRef, MemberId, OrganizationId},
};
use docwarden_persistence::{InMemoryBlobStore, InMemoryEntityStore};

// ============================================================================
// Fault-injecting wrappers
// ============================================================================

#[derive(Default)]
struct FlakyStore {
    inner: InMemoryEntityStore,
    fail_insert_document: AtomicBool,
    fail_update_document: AtomicBool,
    fail_delete_of: Mutex<Option<DocumentId>>,
}

fn store_down() -> DomainError {
    DomainError::StoreFailure {
        reason: "injected store failure".into(),
    }
}

#[async_trait]
impl OrganizationRepository for FlakyStore {
    async fn insert_organization(&self, organization: &Organization) -> DomainResult<()> {
        self.inner.insert_organization(organization).await
    }

    async fn find_organization(&self, id: &OrganizationId) -> DomainResult<Option<Organization>> {
        self.inner.find_organization(id).await
    }

    async fn list_organizations(&self) -> DomainResult<Vec<Organization>> {
        self.inner.list_organizations().await
    }

    async fn delete_organization(&self, id: &OrganizationId) -> DomainResult<()> {
        self.inner.delete_organization(id).await
    }

    async fn organization_exists(&self, id: &OrganizationId) -> DomainResult<bool> {
        self.inner.organization_exists(id).await
    }
}

#[async_trait]
impl MemberRepository for FlakyStore {
    async fn insert_member(&self, member: &Member) -> DomainResult<()> {
        self.inner.insert_member(member).await
    }

    async fn find_member(&self, id: &MemberId) -> DomainResult<Option<Member>> {
        self.inner.find_member(id).await
    }

    async fn find_members_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Vec<Member>> {
        self.inner.find_members_by_organization(organization_id).await
    }

    async fn find_members(&self, ids: &[MemberId]) -> DomainResult<Vec<Member>> {
        self.inner.find_members(ids).await
    }

    async fn delete_member(&self, id: &MemberId) -> DomainResult<()> {
        self.inner.delete_member(id).await
    }

    async fn member_exists(&self, id: &MemberId) -> DomainResult<bool> {
        self.inner.member_exists(id).await
    }
}

#[async_trait]
impl DocumentRepository for FlakyStore {
    async fn insert_document(&self, document: &Document) -> DomainResult<()> {
        if self.fail_insert_document.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        self.inner.insert_document(document).await
    }

    async fn find_document(&self, id: &DocumentId) -> DomainResult<Option<Document>> {
        self.inner.find_document(id).await
    }

    async fn find_documents_by_owner(&self, owner: &DocumentOwner) -> DomainResult<Vec<Document>> {
        self.inner.find_documents_by_owner(owner).await
    }

    async fn find_documents_by_owners(
        &self,
        owners: &[DocumentOwner],
    ) -> DomainResult<Vec<Document>> {
        self.inner.find_documents_by_owners(owners).await
    }

    async fn find_documents_expiring_on_or_before(
        &self,
        date: NaiveDate,
    ) -> DomainResult<Vec<Document>> {
        self.inner.find_documents_expiring_on_or_before(date).await
    }

    async fn list_documents(&self) -> DomainResult<Vec<Document>> {
        self.inner.list_documents().await
    }

    async fn update_document_file(
        &self,
        id: &DocumentId,
        patch: DocumentFilePatch,
    ) -> DomainResult<Document> {
        if self.fail_update_document.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        self.inner.update_document_file(id, patch).await
    }

    async fn delete_document(&self, id: &DocumentId) -> DomainResult<()> {
        if *self.fail_delete_of.lock() == Some(*id) {
            return Err(store_down());
        }
        self.inner.delete_document(id).await
    }
}

#[derive(Default)]
struct FlakyGateway {
    inner: InMemoryBlobStore,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
}

fn storage_down() -> DomainError {
    DomainError::StorageUnavailable {
        reason: "injected outage".into(),
    }
}

#[async_trait]
impl StorageGateway for FlakyGateway {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> DomainResult<FileRef> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(storage_down());
        }
        self.inner.put(bytes, content_type, suggested_name).await
    }

    async fn get(&self, file_ref: &FileRef) -> DomainResult<StoredFile> {
        self.inner.get(file_ref).await
    }

    async fn delete(&self, file_ref: &FileRef) -> DomainResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(storage_down());
        }
        self.inner.delete(file_ref).await
    }
}

// ============================================================================
// Fixture
// ============================================================================

struct Harness {
    store: Arc<FlakyStore>,
    gateway: Arc<FlakyGateway>,
    manager: LifecycleManager<FlakyStore, FlakyGateway>,
    org: Organization,
    member: Member,
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
}

fn in_days(n: u64) -> NaiveDate {
    today().checked_add_days(Days::new(n)).unwrap()
}

fn caller() -> CallerIdentity {
    CallerIdentity::new("tester")
}

fn scan() -> FileUpload {
    FileUpload::new(vec![0x89, b'P', b'N', b'G']).with_file_name("scan.png")
}

async fn harness() -> Harness {
    let store = Arc::new(FlakyStore::default());
    let gateway = Arc::new(FlakyGateway::default());
    let org = Organization::create("Acme", "Via Roma 1", "Milano", "20100").unwrap();
    store.insert_organization(&org).await.unwrap();
    let member = Member::create(org.id(), "Jane", "Doe").unwrap();
    store.insert_member(&member).await.unwrap();

    let manager = LifecycleManager::new(store.clone(), gateway.clone())
        .with_clock(Arc::new(FixedClock(today())));
    Harness {
        store,
        gateway,
        manager,
        org,
        member,
    }
}

async fn add(h: &Harness, owner: DocumentOwner, title: &str) -> Document {
    let dto = h
        .manager
        .add_document(
            &caller(),
            AddDocumentCommand {
                owner,
                title: title.into(),
                expiry_date: Some(in_days(5)),
                file: Some(scan()),
            },
        )
        .await
        .unwrap();
    let id = DocumentId::from_string(&dto.id).unwrap();
    h.store.find_document(&id).await.unwrap().unwrap()
}

fn renew_cmd(id: DocumentId) -> RenewDocumentCommand {
    RenewDocumentCommand {
        document_id: id,
        new_expiry_date: Some(in_days(60)),
        file: Some(scan()),
    }
}

// ============================================================================
// Add
// ============================================================================

#[tokio::test]
async fn test_add_compensates_when_record_insert_fails() {
    let h = harness().await;
    h.store.fail_insert_document.store(true, Ordering::SeqCst);

    let err = h
        .manager
        .add_document(
            &caller(),
            AddDocumentCommand {
                owner: h.org.id().into(),
                title: "Permit".into(),
                expiry_date: Some(in_days(5)),
                file: Some(scan()),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Repository);
    assert_eq!(h.gateway.inner.count(), 0);
}

#[tokio::test]
async fn test_add_reports_original_error_when_compensation_fails() {
    let h = harness().await;
    h.store.fail_insert_document.store(true, Ordering::SeqCst);
    h.gateway.fail_delete.store(true, Ordering::SeqCst);

    let err = h
        .manager
        .add_document(
            &caller(),
            AddDocumentCommand {
                owner: h.org.id().into(),
                title: "Permit".into(),
                expiry_date: Some(in_days(5)),
                file: Some(scan()),
            },
        )
        .await
        .unwrap_err();

    // The orphaned upload is tolerated; the caller sees the record failure
    assert_eq!(err.kind(), ErrorKind::Repository);
    assert_eq!(h.gateway.inner.count(), 1);
    assert!(h.store.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_storage_outage_is_retryable() {
    let h = harness().await;
    h.gateway.fail_put.store(true, Ordering::SeqCst);

    let err = h
        .manager
        .add_document(
            &caller(),
            AddDocumentCommand {
                owner: h.member.id().into(),
                title: "Badge".into(),
                expiry_date: Some(in_days(5)),
                file: Some(scan()),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert!(err.is_retryable());
    assert!(h.store.list_documents().await.unwrap().is_empty());
}

// ============================================================================
// Renew
// ============================================================================

#[tokio::test]
async fn test_renew_failure_leaves_record_untouched() {
    let h = harness().await;
    let original = add(&h, h.member.id().into(), "Badge").await;
    h.store.fail_update_document.store(true, Ordering::SeqCst);

    let err = h
        .manager
        .renew_document(&caller(), renew_cmd(original.id()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Repository);
    let stored = h.store.find_document(&original.id()).await.unwrap().unwrap();
    assert_eq!(stored, original);
    assert!(h.gateway.inner.contains(original.file_ref()));
    assert_eq!(h.gateway.inner.count(), 1);
}

#[tokio::test]
async fn test_renew_succeeds_when_old_file_cleanup_fails() {
    let h = harness().await;
    let original = add(&h, h.member.id().into(), "Badge").await;
    h.gateway.fail_delete.store(true, Ordering::SeqCst);

    let renewed = h
        .manager
        .renew_document(&caller(), renew_cmd(original.id()))
        .await
        .unwrap();

    assert_eq!(renewed.expiry_date, in_days(60));
    assert_ne!(renewed.file_ref, original.file_ref().as_str());
    // Superseded file is orphaned, never referenced again
    assert_eq!(h.gateway.inner.count(), 2);
}

// ============================================================================
// Delete and cascades
// ============================================================================

#[tokio::test]
async fn test_delete_document_tolerates_file_cleanup_failure() {
    let h = harness().await;
    let doc = add(&h, h.org.id().into(), "Permit").await;
    h.gateway.fail_delete.store(true, Ordering::SeqCst);

    h.manager.delete_document(&caller(), &doc.id()).await.unwrap();
    assert!(h.store.find_document(&doc.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_member_cascade_stops_at_first_failure_and_resumes() {
    let h = harness().await;
    let a = add(&h, h.member.id().into(), "A licence").await;
    let b = add(&h, h.member.id().into(), "B badge").await;
    let c = add(&h, h.member.id().into(), "C certificate").await;
    *h.store.fail_delete_of.lock() = Some(b.id());

    let err = h
        .manager
        .delete_member(&caller(), &h.member.id())
        .await
        .unwrap_err();

    match &err {
        ApplicationError::CascadeIncomplete {
            entity,
            id,
            completed,
            failed_child,
            cause,
        } => {
            assert_eq!(entity, "Member");
            assert_eq!(id, &h.member.id().to_string());
            assert_eq!(completed, &vec![a.id().to_string()]);
            assert_eq!(failed_child, &b.id().to_string());
            assert_eq!(cause.kind(), ErrorKind::Repository);
        }
        other => panic!("expected CascadeIncomplete, got {other:?}"),
    }
    // Parent and unprocessed children survive
    assert!(h.store.member_exists(&h.member.id()).await.unwrap());
    assert!(h.store.find_document(&c.id()).await.unwrap().is_some());

    *h.store.fail_delete_of.lock() = None;
    let summary = h
        .manager
        .delete_member(&caller(), &h.member.id())
        .await
        .unwrap();
    assert_eq!(
        summary.deleted_documents,
        vec![b.id().to_string(), c.id().to_string()]
    );
    assert!(!h.store.member_exists(&h.member.id()).await.unwrap());
    assert_eq!(h.gateway.inner.count(), 0);
}

#[tokio::test]
async fn test_organization_cascade_reports_nested_progress() {
    let h = harness().await;
    let badge = add(&h, h.member.id().into(), "Badge").await;
    let licence = add(&h, h.member.id().into(), "Licence").await;
    let permit = add(&h, h.org.id().into(), "Permit").await;
    *h.store.fail_delete_of.lock() = Some(licence.id());

    let err = h
        .manager
        .delete_organization(&caller(), &h.org.id())
        .await
        .unwrap_err();

    match &err {
        ApplicationError::CascadeIncomplete {
            entity,
            completed,
            failed_child,
            cause,
            ..
        } => {
            assert_eq!(entity, "Organization");
            assert_eq!(failed_child, &h.member.id().to_string());
            assert_eq!(completed, &vec![badge.id().to_string()]);
            assert_eq!(cause.kind(), ErrorKind::CascadeIncomplete);
        }
        other => panic!("expected CascadeIncomplete, got {other:?}"),
    }
    assert!(h.store.organization_exists(&h.org.id()).await.unwrap());
    assert!(h.store.find_document(&permit.id()).await.unwrap().is_some());

    *h.store.fail_delete_of.lock() = None;
    let summary = h
        .manager
        .delete_organization(&caller(), &h.org.id())
        .await
        .unwrap();
    assert_eq!(summary.deleted_members.len(), 1);
    assert_eq!(summary.deleted_documents.len(), 2);
    assert!(!h.store.organization_exists(&h.org.id()).await.unwrap());
}

#[tokio::test]
async fn test_delete_missing_member_is_not_found() {
    let h = harness().await;
    let err = h
        .manager
        .delete_member(&caller(), &MemberId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
