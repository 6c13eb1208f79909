//! Field-level validation errors for the task write path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message attached to `user_id` when the schedule collides with another
/// task of the same user.
pub const OVERLAP_MESSAGE: &str =
    "This user already has an overlapping task during the selected period.";

/// Input field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// `title`
    Title,
    /// `end_date`
    EndDate,
    /// `user_id`
    UserId,
    /// `status_id`
    StatusId,
}

impl TaskField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::EndDate => "end_date",
            Self::UserId => "user_id",
            Self::StatusId => "status_id",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-correctable problem with one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field.
    pub field: TaskField,
    /// Human-readable explanation.
    pub message: String,
}

/// Every field error found in a request, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Creates a collection holding a single error.
    #[must_use]
    pub fn single(field: TaskField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Records an error.
    pub fn push(&mut self, field: TaskField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
        self.errors.sort_by_key(|error| error.field);
    }

    /// Returns `true` when no error was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns all recorded errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn messages_for(&self, field: TaskField) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message.as_str())
            .collect()
    }

    /// Returns `true` when `field` has at least one error.
    #[must_use]
    pub fn has(&self, field: TaskField) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
