//! DocWarden Application Layer
//!
//! Use cases of the document engine: registering organizations and members,
//! the document lifecycle (add, renew, delete, download) with its cascades,
//! and the expiry views built on the classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Application Layer                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Services          │ DTOs                 │ Support           │ Events    │
//! │  ─────────         │ ────                 │ ───────           │ ──────    │
//! │  LifecycleManager  │ AddDocumentCommand   │ CallerIdentity    │ AppEvent  │
//! │  RegistryService   │ RenewDocumentCommand │ EngineSettings    │ Publisher │
//! │  Aggregator        │ DocumentDto          │ Engine            │           │
//! │  DeadlineService   │ DeadlineDto          │                   │           │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ depends on
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Layer                                     │
//! │  Entities, Value Objects, Expiry Policy, Repository Traits, Ports        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Non-Goals
//!
//! - Authentication (callers arrive with an established [`CallerIdentity`])
//! - Concurrency control (last write wins)
//! - Direct I/O (belongs in `docwarden-persistence`)

pub mod dto;
pub mod engine;
pub mod errors;
pub mod events;
pub mod identity;
pub mod services;
pub mod settings;

// Re-export commonly used types
pub use dto::*;
pub use engine::{Engine, EngineBuilder};
pub use errors::{ApplicationError, ApplicationResult, ErrorKind};
pub use events::{
    ApplicationEvent, EventPublisher, InMemoryEventPublisher, LoggingEventPublisher,
    NoOpEventPublisher,
};
pub use identity::CallerIdentity;
pub use services::*;
pub use settings::EngineSettings;
