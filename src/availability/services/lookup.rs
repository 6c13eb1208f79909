//! Read side: a user's occupied days within a window.

use crate::availability::{
    domain::UserAvailability,
    ports::{AvailabilityRepository, AvailabilityRepositoryError},
};
use crate::task::{
    domain::{DateRange, UserId},
    ports::{DirectoryError, UserDirectory},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by availability lookups.
#[derive(Debug, Clone, Error)]
pub enum AvailabilityLookupError {
    /// The user does not exist.
    #[error("The selected user id is invalid.")]
    UnknownUser(UserId),
    /// User lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Availability lookup failed.
    #[error(transparent)]
    Availability(#[from] AvailabilityRepositoryError),
}

/// Lists the days a user is occupied.
#[derive(Clone)]
pub struct AvailabilityLookupService<A, U>
where
    A: AvailabilityRepository,
    U: UserDirectory,
{
    availability: Arc<A>,
    users: Arc<U>,
}

impl<A, U> AvailabilityLookupService<A, U>
where
    A: AvailabilityRepository,
    U: UserDirectory,
{
    /// Creates a lookup service.
    #[must_use]
    pub const fn new(availability: Arc<A>, users: Arc<U>) -> Self {
        Self {
            availability,
            users,
        }
    }

    /// Returns the user's rows dated inside `window`, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityLookupError::UnknownUser`] when the user does not
    /// exist, or the underlying repository error.
    pub async fn for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> Result<Vec<UserAvailability>, AvailabilityLookupError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AvailabilityLookupError::UnknownUser(user_id));
        }
        Ok(self
            .availability
            .find_for_user_between(user_id, window)
            .await?)
    }
}
