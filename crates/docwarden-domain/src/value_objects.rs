//! Value objects representing immutable domain concepts

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Create from string representation
            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(uuid::Uuid::parse_str(s.trim())?))
            }

            /// Wrap an existing UUID
            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

uuid_identifier!(
    /// Organization identifier
    OrganizationId
);

uuid_identifier!(
    /// Member identifier
    MemberId
);

uuid_identifier!(
    /// Document identifier
    DocumentId
);

/// Opaque handle to stored file bytes, issued by a storage gateway.
///
/// The engine stores and hands it back; it never inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a document owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Organization,
    Member,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Organization => "organization",
            OwnerKind::Member => "member",
        }
    }

    /// Entity type name used in error reports
    pub fn entity_name(&self) -> &'static str {
        match self {
            OwnerKind::Organization => "Organization",
            OwnerKind::Member => "Member",
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single entity a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentOwner {
    Organization(OrganizationId),
    Member(MemberId),
}

impl DocumentOwner {
    pub fn kind(&self) -> OwnerKind {
        match self {
            DocumentOwner::Organization(_) => OwnerKind::Organization,
            DocumentOwner::Member(_) => OwnerKind::Member,
        }
    }

    /// Raw UUID of the owner, regardless of kind
    pub fn id(&self) -> uuid::Uuid {
        match self {
            DocumentOwner::Organization(id) => id.as_uuid(),
            DocumentOwner::Member(id) => id.as_uuid(),
        }
    }

    /// Build an owner from its discriminant and a raw id string
    pub fn parse(kind: OwnerKind, id: &str) -> Result<Self, uuid::Error> {
        Ok(match kind {
            OwnerKind::Organization => DocumentOwner::Organization(OrganizationId::from_string(id)?),
            OwnerKind::Member => DocumentOwner::Member(MemberId::from_string(id)?),
        })
    }
}

impl From<OrganizationId> for DocumentOwner {
    fn from(id: OrganizationId) -> Self {
        DocumentOwner::Organization(id)
    }
}

impl From<MemberId> for DocumentOwner {
    fn from(id: MemberId) -> Self {
        DocumentOwner::Member(id)
    }
}

impl fmt::Display for DocumentOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}
