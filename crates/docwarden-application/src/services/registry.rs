//! Organization and member registry, plus document lookups
//!
//! Creation goes through the domain constructors, which own the field
//! rules. Deletion is a lifecycle concern and lives in
//! [`LifecycleManager`](super::LifecycleManager) because it cascades into
//! stored files.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use docwarden_domain::{
    entities::{Member, Organization},
    expiry::ExpiryPolicy,
    ports::{Clock, SystemClock},
    repositories::EntityStore,
    value_objects::{DocumentId, DocumentOwner, MemberId, OrganizationId},
};

use crate::dto::{
    CreateMemberCommand, CreateOrganizationCommand, DocumentDto, MemberDto, OrganizationDto,
};
use crate::errors::{ApplicationError, ApplicationResult};
use crate::events::{ApplicationEvent, EventPublisher, NoOpEventPublisher};
use crate::identity::CallerIdentity;

/// Case-insensitive substring match; a blank needle matches everything
fn matches_search(haystacks: &[&str], search: Option<&str>) -> bool {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(&needle))
        }
    }
}

/// Registry Application Service
pub struct RegistryService<S>
where
    S: EntityStore,
{
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    policy: ExpiryPolicy,
    events: Arc<dyn EventPublisher>,
}

impl<S> RegistryService<S>
where
    S: EntityStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
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

    /// Register an organization; every address field is required
    pub async fn create_organization(
        &self,
        caller: &CallerIdentity,
        cmd: CreateOrganizationCommand,
    ) -> ApplicationResult<OrganizationDto> {
        let actor = caller.ensure_authenticated()?;

        let organization =
            Organization::create(&cmd.name, &cmd.address, &cmd.city, &cmd.postal_code)?;
        self.store.insert_organization(&organization).await?;

        info!(organization_id = %organization.id(), actor, "Organization created");
        self.events
            .publish(ApplicationEvent::OrganizationCreated {
                organization_id: organization.id(),
                name: organization.name().to_string(),
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(OrganizationDto::from_domain(&organization))
    }

    /// Register a member of an existing organization
    pub async fn create_member(
        &self,
        caller: &CallerIdentity,
        cmd: CreateMemberCommand,
    ) -> ApplicationResult<MemberDto> {
        let actor = caller.ensure_authenticated()?;

        let member = Member::create(cmd.organization_id, &cmd.first_name, &cmd.last_name)?;
        if !self.store.organization_exists(&cmd.organization_id).await? {
            return Err(ApplicationError::not_found(
                "Organization",
                cmd.organization_id,
            ));
        }
        self.store.insert_member(&member).await?;

        info!(member_id = %member.id(), organization_id = %cmd.organization_id, actor, "Member created");
        self.events
            .publish(ApplicationEvent::MemberCreated {
                member_id: member.id(),
                organization_id: cmd.organization_id,
                actor: actor.to_string(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(MemberDto::from_domain(&member))
    }

    pub async fn get_organization(&self, id: &OrganizationId) -> ApplicationResult<OrganizationDto> {
        let organization = self
            .store
            .find_organization(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Organization", id))?;
        Ok(OrganizationDto::from_domain(&organization))
    }

    pub async fn get_member(&self, id: &MemberId) -> ApplicationResult<MemberDto> {
        let member = self
            .store
            .find_member(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Member", id))?;
        Ok(MemberDto::from_domain(&member))
    }

    /// Organizations ordered by name, optionally filtered by name or city
    pub async fn list_organizations(
        &self,
        search: Option<&str>,
    ) -> ApplicationResult<Vec<OrganizationDto>> {
        let organizations = self.store.list_organizations().await?;
        Ok(organizations
            .iter()
            .filter(|o| matches_search(&[o.name(), o.city()], search))
            .map(OrganizationDto::from_domain)
            .collect())
    }

    /// Members of an organization ordered by last then first name,
    /// optionally filtered by name
    pub async fn list_members(
        &self,
        organization_id: &OrganizationId,
        search: Option<&str>,
    ) -> ApplicationResult<Vec<MemberDto>> {
        if !self.store.organization_exists(organization_id).await? {
            return Err(ApplicationError::not_found("Organization", organization_id));
        }

        let members = self
            .store
            .find_members_by_organization(organization_id)
            .await?;
        Ok(members
            .iter()
            .filter(|m| matches_search(&[m.first_name(), m.last_name()], search))
            .map(MemberDto::from_domain)
            .collect())
    }

    /// Documents of one owner, classified for today
    pub async fn list_documents(&self, owner: &DocumentOwner) -> ApplicationResult<Vec<DocumentDto>> {
        let exists = match owner {
            DocumentOwner::Organization(id) => self.store.organization_exists(id).await?,
            DocumentOwner::Member(id) => self.store.member_exists(id).await?,
        };
        if !exists {
            return Err(ApplicationError::not_found(
                owner.kind().entity_name(),
                owner.id(),
            ));
        }

        let today = self.clock.today();
        let documents = self.store.find_documents_by_owner(owner).await?;
        Ok(documents
            .iter()
            .map(|d| DocumentDto::from_domain(d, d.status(&self.policy, today)))
            .collect())
    }

    pub async fn get_document(&self, id: &DocumentId) -> ApplicationResult<DocumentDto> {
        let document = self
            .store
            .find_document(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Document", id))?;
        let status = document.status(&self.policy, self.clock.today());
        Ok(DocumentDto::from_domain(&document, status))
    }
}
