//! Data Transfer Objects (DTOs) for layer boundary crossing
//!
//! DTOs keep domain types out of presentation code. Identifiers are rendered
//! as strings and every document carries its classification for the day the
//! DTO was built.

pub mod document;
pub mod registry;

// Re-export commonly used DTOs
pub use document::*;
pub use registry::*;
