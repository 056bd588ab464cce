//! # Identity Newtypes
//!
//! Identifiers for the three persisted records. Each identifier is a
//! distinct type: you cannot pass a [`PropertyId`] where a
//! [`CropSeasonId`] is expected, which keeps the ownership-scoped lookups
//! honest at compile time.
//!
//! UUID-based identifiers are always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Implements the shared constructor/accessor surface for a UUID newtype.
macro_rules! uuid_identifier {
    ($ty:ident) => {
        impl $ty {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $ty {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

/// Identifier of a rural producer (person or legal entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProducerId(Uuid);

/// Identifier of a property owned by a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(Uuid);

/// Identifier of a crop season planted on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropSeasonId(Uuid);

uuid_identifier!(ProducerId);
uuid_identifier!(PropertyId);
uuid_identifier!(CropSeasonId);

/// The tracked resource kinds, as they appear in audit records and
/// not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    #[serde(rename = "PRODUTOR")]
    Producer,
    #[serde(rename = "PROPRIEDADE")]
    Property,
    #[serde(rename = "SAFRA_CULTURA")]
    CropSeason,
}

impl Resource {
    /// Audit label for this resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "PRODUTOR",
            Self::Property => "PROPRIEDADE",
            Self::CropSeason => "SAFRA_CULTURA",
        }
    }

    /// The user-facing message for a lookup that resolved to nothing.
    ///
    /// The same text is produced whether the record is absent or owned by
    /// someone else.
    pub fn not_found_message(&self, id: &str) -> String {
        match self {
            Self::Producer => format!("Produtor com ID {id} não encontrado"),
            Self::Property => format!("Propriedade com ID {id} não encontrada"),
            Self::CropSeason => format!("Safra/Cultura com ID {id} não encontrada"),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
