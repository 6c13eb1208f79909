//! Task status reference data.

use super::{TaskDomainError, TaskStatusId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a status name, matching the `VARCHAR(100)` column.
const MAX_STATUS_NAME_LENGTH: usize = 100;

/// Validated display name of a task status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusName(String);

impl StatusName {
    /// Creates a validated status name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStatusName`] when the value is empty
    /// after trimming or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > MAX_STATUS_NAME_LENGTH {
            return Err(TaskDomainError::EmptyStatusName);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the status name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display colour hint in `#RRGGBB` form, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusColor(String);

impl StatusColor {
    /// Creates a validated colour.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusColor`] unless the value is a
    /// `#` followed by six hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let digits = normalized.strip_prefix('#').unwrap_or_default();
        let is_valid = digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !is_valid {
            return Err(TaskDomainError::InvalidStatusColor(raw));
        }
        Ok(Self(normalized.to_ascii_uppercase()))
    }

    /// Returns the colour as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named workflow status shared by many tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    id: TaskStatusId,
    name: StatusName,
    color: StatusColor,
}

/// Names and colours installed by the seed command.
const DEFAULT_CATALOGUE: [(&str, &str); 4] = [
    ("To Do", "#6B7280"),
    ("In Progress", "#3B82F6"),
    ("Completed", "#10B981"),
    ("Cancelled", "#EF4444"),
];

impl TaskStatus {
    /// Creates a status with a fresh identifier.
    #[must_use]
    pub fn new(name: StatusName, color: StatusColor) -> Self {
        Self::with_id(TaskStatusId::new(), name, color)
    }

    /// Reconstructs a status with a known identifier.
    #[must_use]
    pub const fn with_id(id: TaskStatusId, name: StatusName, color: StatusColor) -> Self {
        Self { id, name, color }
    }

    /// Builds the default status catalogue: To Do, In Progress, Completed
    /// and Cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] if a catalogue entry fails validation.
    pub fn default_catalogue() -> Result<Vec<Self>, TaskDomainError> {
        DEFAULT_CATALOGUE
            .iter()
            .map(|(name, color)| Ok(Self::new(StatusName::new(*name)?, StatusColor::new(*color)?)))
            .collect()
    }

    /// Returns the status identifier.
    #[must_use]
    pub const fn id(&self) -> TaskStatusId {
        self.id
    }

    /// Returns the status name.
    #[must_use]
    pub const fn name(&self) -> &StatusName {
        &self.name
    }

    /// Returns the display colour.
    #[must_use]
    pub const fn color(&self) -> &StatusColor {
        &self.color
    }
}
