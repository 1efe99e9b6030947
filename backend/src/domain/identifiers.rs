//! UUID-backed identifiers for the aggregates owned by this service.
//!
//! Each identifier is a distinct newtype so a dose id can never be passed
//! where a child id is expected. All of them serialise as canonical UUID
//! strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdentifierParseError {
    kind: &'static str,
}

impl IdentifierParseError {
    /// Human-readable name of the identifier that failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierParseError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                if raw.trim() != raw {
                    return Err(IdentifierParseError { kind: $label });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdentifierParseError { kind: $label })
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of the guardian account (parent or school) owning children.
    GuardianId,
    "guardian id"
);
uuid_identifier!(
    /// Identifier of an enrolled child.
    ChildId,
    "child id"
);
uuid_identifier!(
    /// Identifier of one scheduled dose.
    DoseRecordId,
    "dose record id"
);
uuid_identifier!(
    /// Identifier of one notification log entry.
    NotificationLogEntryId,
    "notification log entry id"
);
