//! Upcoming deadlines view

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use docwarden_domain::{
    entities::{Member, Organization},
    expiry::ExpiryPolicy,
    ports::{Clock, SystemClock},
    repositories::EntityStore,
    value_objects::{DocumentOwner, MemberId, OrganizationId},
};

use crate::dto::{DeadlineDto, DocumentDto};
use crate::errors::ApplicationResult;

/// Lists documents due within the dashboard window, expired ones included
pub struct DeadlineService<S>
where
    S: EntityStore,
{
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    policy: ExpiryPolicy,
}

impl<S> DeadlineService<S>
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

    /// Documents expiring on or before `today + dashboard window`, soonest
    /// first, with owner display names resolved
    pub async fn upcoming_deadlines(&self) -> ApplicationResult<Vec<DeadlineDto>> {
        let today = self.clock.today();
        let documents = self
            .store
            .find_documents_expiring_on_or_before(self.policy.dashboard_horizon(today))
            .await?;
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut member_ids: Vec<MemberId> = documents
            .iter()
            .filter_map(|d| match d.owner() {
                DocumentOwner::Member(id) => Some(id),
                DocumentOwner::Organization(_) => None,
            })
            .collect();
        member_ids.sort();
        member_ids.dedup();

        let members: HashMap<MemberId, Member> = if member_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .find_members(&member_ids)
                .await?
                .into_iter()
                .map(|m| (m.id(), m))
                .collect()
        };
        let organizations: HashMap<OrganizationId, Organization> = self
            .store
            .list_organizations()
            .await?
            .into_iter()
            .map(|o| (o.id(), o))
            .collect();

        let org_name = |id: &OrganizationId| {
            organizations
                .get(id)
                .map(|o| o.name().to_string())
                .unwrap_or_default()
        };

        let mut deadlines = Vec::with_capacity(documents.len());
        for doc in &documents {
            let (owner_name, organization_id) = match doc.owner() {
                DocumentOwner::Organization(id) => (org_name(&id), id),
                DocumentOwner::Member(id) => match members.get(&id) {
                    Some(member) => (member.full_name(), member.organization_id()),
                    None => {
                        // Record removed between the two reads
                        warn!(document_id = %doc.id(), member_id = %id, "Deadline owner vanished");
                        continue;
                    }
                },
            };

            deadlines.push(DeadlineDto {
                document: DocumentDto::from_domain(doc, doc.status(&self.policy, today)),
                owner_name,
                organization_id: organization_id.to_string(),
                organization_name: org_name(&organization_id),
                days_remaining: (doc.expiry_date() - today).num_days(),
            });
        }

        Ok(deadlines)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use docwarden_domain::{
        entities::Document,
        expiry::ExpiryStatus,
        ports::FixedClock,
        repositories::{DocumentRepository, MemberRepository, OrganizationRepository},
        value_objects::FileRef,
    };
    use docwarden_persistence::InMemoryEntityStore;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_upcoming_deadlines_window_and_order() {
        let store = Arc::new(InMemoryEntityStore::new());
        let org = Organization::create("Acme", "Via Roma 1", "Milano", "20100").unwrap();
        store.insert_organization(&org).await.unwrap();
        let jane = Member::create(org.id(), "Jane", "Doe").unwrap();
        store.insert_member(&jane).await.unwrap();

        let entries = [
            (DocumentOwner::from(jane.id()), "Badge", 20u64),
            (DocumentOwner::from(org.id()), "Permit", 2),
            (DocumentOwner::from(org.id()), "Insurance", 31),
        ];
        for (owner, title, days) in entries {
            let expiry = today().checked_add_days(Days::new(days)).unwrap();
            let doc = Document::create(owner, title, expiry, FileRef::new(title)).unwrap();
            store.insert_document(&doc).await.unwrap();
        }
        let overdue = today().checked_sub_days(Days::new(4)).unwrap();
        let doc = Document::create(org.id().into(), "Old", overdue, FileRef::new("old")).unwrap();
        store.insert_document(&doc).await.unwrap();

        let service = DeadlineService::new(store).with_clock(Arc::new(FixedClock(today())));
        let deadlines = service.upcoming_deadlines().await.unwrap();

        let titles: Vec<&str> = deadlines.iter().map(|d| d.document.title.as_str()).collect();
        assert_eq!(titles, vec!["Old", "Permit", "Badge"]);
        assert_eq!(deadlines[0].document.status, ExpiryStatus::Expired);
        assert_eq!(deadlines[0].days_remaining, -4);
        assert_eq!(deadlines[1].document.status, ExpiryStatus::ExpiringSoon);
        assert_eq!(deadlines[2].owner_name, "Jane Doe");
        assert_eq!(deadlines[2].organization_name, "Acme");
        assert_eq!(deadlines[2].document.status, ExpiryStatus::Ok);
    }

    #[tokio::test]
    async fn test_no_deadlines() {
        let service = DeadlineService::new(Arc::new(InMemoryEntityStore::new()));
        assert!(service.upcoming_deadlines().await.unwrap().is_empty());
    }
}
