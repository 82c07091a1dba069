//! Port interfaces for external collaborators
//!
//! Ports define the contracts for external system integrations.
//! These are implemented by infrastructure crates.
//!
//! ## Modules
//!
//! - `storage`: blob storage gateway for document file bytes
//! - `clock`: source of the current calendar day

pub mod clock;
pub mod storage;

pub use clock::*;
pub use storage::*;
