//! Availability rows keyed by `(user, day)`, held behind a single lock.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::availability::{
    domain::{AvailabilityPlan, MaterializationReport, TaskSpan, UserAvailability},
    ports::{AvailabilityRepository, AvailabilityRepositoryError, AvailabilityResult},
};
use crate::task::domain::{DateRange, TaskId, UserId};

type SlotKey = (UserId, NaiveDate);

/// Thread-safe in-memory availability repository.
///
/// The map key mirrors the `(user_id, date)` unique index, and each
/// regeneration runs under one write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAvailabilityRepository {
    rows: Arc<RwLock<BTreeMap<SlotKey, UserAvailability>>>,
}

impl InMemoryAvailabilityRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row directly, bypassing regeneration.
    ///
    /// Lets tests reproduce rows left behind by earlier writes.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityRepositoryError::ConcurrentClaim`] when the user
    /// already holds the day.
    pub fn seed(&self, row: UserAvailability) -> AvailabilityResult<()> {
        let mut rows = self.rows.write().map_err(|err| poisoned(&err))?;
        let key = (row.user_id(), row.date());
        if rows.contains_key(&key) {
            return Err(AvailabilityRepositoryError::ConcurrentClaim(row.user_id()));
        }
        rows.insert(key, row);
        Ok(())
    }
}

fn poisoned(err: &impl ToString) -> AvailabilityRepositoryError {
    AvailabilityRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityRepository {
    async fn regenerate(
        &self,
        span: &TaskSpan,
        materialized_at: DateTime<Utc>,
    ) -> AvailabilityResult<MaterializationReport> {
        let mut rows = self.rows.write().map_err(|err| poisoned(&err))?;
        rows.retain(|_, row| row.task_id() != span.task_id);

        let foreign_claims: BTreeSet<NaiveDate> = rows
            .range((span.user_id, span.range.start())..=(span.user_id, span.range.end()))
            .map(|((_, day), _)| *day)
            .collect();

        let plan = AvailabilityPlan::build(span, &foreign_claims);
        for row in plan.rows(span, materialized_at) {
            rows.insert((row.user_id(), row.date()), row);
        }
        Ok(plan.into_report(span))
    }

    async fn remove_for_task(&self, task_id: TaskId) -> AvailabilityResult<usize> {
        let mut rows = self.rows.write().map_err(|err| poisoned(&err))?;
        let before = rows.len();
        rows.retain(|_, row| row.task_id() != task_id);
        Ok(before.saturating_sub(rows.len()))
    }

    async fn find_for_task(&self, task_id: TaskId) -> AvailabilityResult<Vec<UserAvailability>> {
        let rows = self.rows.read().map_err(|err| poisoned(&err))?;
        let mut owned: Vec<UserAvailability> = rows
            .values()
            .filter(|row| row.task_id() == task_id)
            .cloned()
            .collect();
        owned.sort_by_key(UserAvailability::date);
        Ok(owned)
    }

    async fn find_for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> AvailabilityResult<Vec<UserAvailability>> {
        let rows = self.rows.read().map_err(|err| poisoned(&err))?;
        Ok(rows
            .range((user_id, window.start())..=(user_id, window.end()))
            .map(|(_, row)| row.clone())
            .collect())
    }
}
