//! Guardian accounts as seen by this service.
//!
//! Guardians are owned by the identity service; this crate only reads them to
//! resolve a reminder recipient.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::GuardianId;

/// Validation errors for guardian attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardianValidationError {
    /// The e-mail address is blank.
    #[error("email address must not be empty")]
    EmptyEmail,
    /// The e-mail address does not look like `local@domain`.
    #[error("email address must contain a local part and a domain")]
    MalformedEmail,
    /// The guardian kind is not recognised.
    #[error("guardian kind must be parent or school")]
    UnknownKind,
}

/// Recipient address for e-mail reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    ///
    /// Only the coarse `local@domain` shape is checked; deliverability is
    /// the relay's concern.
    pub fn new(raw: impl Into<String>) -> Result<Self, GuardianValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GuardianValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(GuardianValidationError::MalformedEmail),
        }
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = GuardianValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Whether the account is a parent or an institution that bulk-enrols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardianKind {
    /// A parent or carer enrolling their own children.
    Parent,
    /// A school importing children in bulk.
    School,
}

impl GuardianKind {
    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::School => "school",
        }
    }
}

impl FromStr for GuardianKind {
    type Err = GuardianValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "parent" => Ok(Self::Parent),
            "school" => Ok(Self::School),
            _ => Err(GuardianValidationError::UnknownKind),
        }
    }
}

/// A guardian account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guardian {
    id: GuardianId,
    display_name: String,
    email: EmailAddress,
    kind: GuardianKind,
}

impl Guardian {
    /// Assemble a guardian from validated parts.
    pub fn new(
        id: GuardianId,
        display_name: impl Into<String>,
        email: EmailAddress,
        kind: GuardianKind,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email,
            kind,
        }
    }

    /// Account identifier.
    pub fn id(&self) -> GuardianId {
        self.id
    }

    /// Name shown in greetings.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Reminder recipient.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Parent or school.
    pub fn kind(&self) -> GuardianKind {
        self.kind
    }
}
