//! Minimal view of the user accounts tasks are assigned to.

use super::{ActorRole, TaskDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercased email address with a local part and a dotted domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidEmail`] when the value lacks a local
    /// part, an `@`, or a domain.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let is_valid = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            })
            && !normalized.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(TaskDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User account referenced by tasks.
///
/// Authentication lives elsewhere; the task context only needs to know that
/// a user exists and what role it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: UserId,
    name: String,
    email: EmailAddress,
    role: ActorRole,
}

impl UserAccount {
    /// Creates a user account with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUserName`] when `name` is blank.
    pub fn new(
        name: impl Into<String>,
        email: EmailAddress,
        role: ActorRole,
    ) -> Result<Self, TaskDomainError> {
        Self::with_id(UserId::new(), name, email, role)
    }

    /// Reconstructs a user account with a known identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUserName`] when `name` is blank.
    pub fn with_id(
        id: UserId,
        name: impl Into<String>,
        email: EmailAddress,
        role: ActorRole,
    ) -> Result<Self, TaskDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyUserName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            email,
            role,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> ActorRole {
        self.role
    }
}
