//! Application layer services
//!
//! Services are stateless over injected `Arc` dependencies and read "today"
//! from a [`Clock`](docwarden_domain::ports::Clock) so classification can be
//! pinned in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Services                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LifecycleManager - add / renew / delete / download, cascades│
//! │  RegistryService  - organizations, members, lookups          │
//! │  Aggregator       - expiring-or-expired roll-ups             │
//! │  DeadlineService  - upcoming deadlines view                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod aggregator;
mod deadlines;
mod lifecycle;
mod registry;

pub use aggregator::Aggregator;
pub use deadlines::DeadlineService;
pub use lifecycle::LifecycleManager;
pub use registry::RegistryService;
