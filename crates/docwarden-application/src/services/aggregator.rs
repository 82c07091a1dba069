//! Expiry roll-ups over organizations and members
//!
//! Flags are recomputed from the live document set on every call. Each
//! query issues a fixed number of store round trips regardless of how many
//! members or documents are involved.

use std::collections::HashSet;
use std::sync::Arc;

use docwarden_domain::{
    entities::Document,
    expiry::ExpiryPolicy,
    ports::{Clock, SystemClock},
    repositories::EntityStore,
    value_objects::{DocumentOwner, MemberId, OrganizationId},
};
use tracing::debug;

use crate::dto::{MemberDto, MemberOverviewDto, OrganizationDto, OrganizationOverviewDto};
use crate::errors::{ApplicationError, ApplicationResult};

/// Answers "does this owner need attention?"
pub struct Aggregator<S>
where
    S: EntityStore,
{
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    policy: ExpiryPolicy,
}

impl<S> Clone for Aggregator<S>
where
    S: EntityStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<S> Aggregator<S>
where
    S: EntityStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            policy: ExpiryPolicy::default(),
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

    fn any_needs_attention(&self, documents: &[Document]) -> bool {
        let today = self.clock.today();
        documents
            .iter()
            .any(|doc| doc.status(&self.policy, today).needs_attention())
    }

    /// Whether the owner, or for an organization any of its members, holds a
    /// document that is expiring soon or expired
    ///
    /// Unknown owners hold no documents and report `false`.
    pub async fn has_expiring_or_expired(&self, owner: &DocumentOwner) -> ApplicationResult<bool> {
        let documents = match owner {
            DocumentOwner::Member(_) => self.store.find_documents_by_owner(owner).await?,
            DocumentOwner::Organization(organization_id) => {
                let members = self
                    .store
                    .find_members_by_organization(organization_id)
                    .await?;
                let mut owners = Vec::with_capacity(members.len() + 1);
                owners.push(*owner);
                owners.extend(members.iter().map(|m| DocumentOwner::Member(m.id())));
                self.store.find_documents_by_owners(&owners).await?
            }
        };

        let flagged = self.any_needs_attention(&documents);
        debug!(owner = %owner, documents = documents.len(), flagged, "Computed expiry flag");
        Ok(flagged)
    }

    /// Every organization ordered by name, flagged for direct and member
    /// documents needing attention
    pub async fn organization_overview(&self) -> ApplicationResult<Vec<OrganizationOverviewDto>> {
        let today = self.clock.today();
        let organizations = self.store.list_organizations().await?;
        let attention = self
            .store
            .find_documents_expiring_on_or_before(self.policy.warning_horizon(today))
            .await?;

        let mut direct: HashSet<OrganizationId> = HashSet::new();
        let mut member_ids: Vec<MemberId> = Vec::new();
        for doc in &attention {
            match doc.owner() {
                DocumentOwner::Organization(id) => {
                    direct.insert(id);
                }
                DocumentOwner::Member(id) => member_ids.push(id),
            }
        }
        member_ids.sort();
        member_ids.dedup();

        let via_members: HashSet<OrganizationId> = if member_ids.is_empty() {
            HashSet::new()
        } else {
            self.store
                .find_members(&member_ids)
                .await?
                .iter()
                .map(|m| m.organization_id())
                .collect()
        };

        Ok(organizations
            .iter()
            .map(|org| OrganizationOverviewDto {
                organization: OrganizationDto::from_domain(org),
                has_expiring_documents: direct.contains(&org.id()),
                has_expiring_member_documents: via_members.contains(&org.id()),
            })
            .collect())
    }

    /// Members of an organization with their individual flags
    pub async fn member_overview(
        &self,
        organization_id: &OrganizationId,
    ) -> ApplicationResult<Vec<MemberOverviewDto>> {
        if !self.store.organization_exists(organization_id).await? {
            return Err(ApplicationError::not_found("Organization", organization_id));
        }

        let members = self
            .store
            .find_members_by_organization(organization_id)
            .await?;
        let owners: Vec<DocumentOwner> = members
            .iter()
            .map(|m| DocumentOwner::Member(m.id()))
            .collect();
        let documents = self.store.find_documents_by_owners(&owners).await?;

        let today = self.clock.today();
        let flagged: HashSet<DocumentOwner> = documents
            .iter()
            .filter(|doc| doc.status(&self.policy, today).needs_attention())
            .map(|doc| doc.owner())
            .collect();

        Ok(members
            .iter()
            .map(|m| MemberOverviewDto {
                member: MemberDto::from_domain(m),
                has_expiring_documents: flagged.contains(&DocumentOwner::Member(m.id())),
            })
            .collect())
    }
}
