//! Application layer events
//!
//! One event per completed lifecycle use case, carrying the acting subject.
//! Publishing is best effort: a publisher cannot fail the operation that
//! produced the event.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use docwarden_domain::value_objects::{DocumentId, DocumentOwner, MemberId, OrganizationId};

/// Application-level event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApplicationEvent {
    // === Registry Events ===
    OrganizationCreated {
        organization_id: OrganizationId,
        name: String,
        actor: String,
        timestamp: DateTime<Utc>,
    },

    /// Organization removed together with its members and documents
    OrganizationDeleted {
        organization_id: OrganizationId,
        actor: String,
        timestamp: DateTime<Utc>,
    },

    MemberCreated {
        member_id: MemberId,
        organization_id: OrganizationId,
        actor: String,
        timestamp: DateTime<Utc>,
    },

    /// Member removed together with their documents
    MemberDeleted {
        member_id: MemberId,
        actor: String,
        timestamp: DateTime<Utc>,
    },

    // === Document Events ===
    DocumentAdded {
        document_id: DocumentId,
        owner: DocumentOwner,
        expiry_date: NaiveDate,
        actor: String,
        timestamp: DateTime<Utc>,
    },

    DocumentRenewed {
        document_id: DocumentId,
        previous_expiry_date: NaiveDate,
        expiry_date: NaiveDate,
        actor: String,
        timestamp: DateTime<Utc>,
    },

    DocumentDeleted {
        document_id: DocumentId,
        actor: String,
        timestamp: DateTime<Utc>,
    },
}

impl ApplicationEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ApplicationEvent::OrganizationCreated { .. } => "OrganizationCreated",
            ApplicationEvent::OrganizationDeleted { .. } => "OrganizationDeleted",
            ApplicationEvent::MemberCreated { .. } => "MemberCreated",
            ApplicationEvent::MemberDeleted { .. } => "MemberDeleted",
            ApplicationEvent::DocumentAdded { .. } => "DocumentAdded",
            ApplicationEvent::DocumentRenewed { .. } => "DocumentRenewed",
            ApplicationEvent::DocumentDeleted { .. } => "DocumentDeleted",
        }
    }

    /// Get the event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ApplicationEvent::OrganizationCreated { timestamp, .. }
            | ApplicationEvent::OrganizationDeleted { timestamp, .. }
            | ApplicationEvent::MemberCreated { timestamp, .. }
            | ApplicationEvent::MemberDeleted { timestamp, .. }
            | ApplicationEvent::DocumentAdded { timestamp, .. }
            | ApplicationEvent::DocumentRenewed { timestamp, .. }
            | ApplicationEvent::DocumentDeleted { timestamp, .. } => *timestamp,
        }
    }

    /// Subject that performed the operation
    pub fn actor(&self) -> &str {
        match self {
            ApplicationEvent::OrganizationCreated { actor, .. }
            | ApplicationEvent::OrganizationDeleted { actor, .. }
            | ApplicationEvent::MemberCreated { actor, .. }
            | ApplicationEvent::MemberDeleted { actor, .. }
            | ApplicationEvent::DocumentAdded { actor, .. }
            | ApplicationEvent::DocumentRenewed { actor, .. }
            | ApplicationEvent::DocumentDeleted { actor, .. } => actor,
        }
    }
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an application event
    async fn publish(&self, event: ApplicationEvent);
}

/// Publisher that discards events
#[derive(Debug, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ApplicationEvent) {}
}

/// Publisher that writes each event to the `tracing` audit target
#[derive(Debug, Default)]
pub struct LoggingEventPublisher;

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: ApplicationEvent) {
        info!(
            target: "docwarden::audit",
            event = event.event_type(),
            actor = event.actor(),
            at = %event.timestamp(),
            "{:?}",
            event
        );
    }
}

/// In-memory event collector for testing
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<ApplicationEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<ApplicationEvent> {
        self.events.lock().clone()
    }

    /// Event type names in publication order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.event_type()).collect()
    }

    /// Clear collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: ApplicationEvent) {
        self.events.lock().push(event);
    }
}
