//! Task write path: authorisation, validation, overlap gating, persistence
//! and the post-commit side effects.

use super::{OVERLAP_MESSAGE, OverlapCheckPolicy, OverlapChecker, TaskField, ValidationErrors};
use crate::availability::ports::{
    AvailabilityRepository, AvailabilityRepositoryError, MaterializationQueue,
};
use crate::notification::{domain::AssignmentNotification, ports::AssignmentNotifier};
use crate::task::{
    domain::{
        Actor, DateRange, NewTask, Task, TaskDomainError, TaskId, TaskStatus, TaskStatusId,
        TaskTitle, UserId,
    },
    ports::{
        DirectoryError, TaskPage, TaskQuery, TaskRepository, TaskRepositoryError,
        TaskStatusRepository, UserDirectory,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Default number of tasks per listing page.
const DEFAULT_PAGE_SIZE: usize = 20;

/// Request payload for creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    title: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    user_id: UserId,
    status_id: TaskStatusId,
}

impl TaskInput {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        user_id: UserId,
        status_id: TaskStatusId,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_date,
            end_date,
            user_id,
            status_id,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Listing filters.
///
/// `user_id` is honoured for administrators only; members always see their
/// own tasks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Restrict to one status.
    pub status_id: Option<TaskStatusId>,
    /// Restrict to one assignee.
    pub user_id: Option<UserId>,
}

/// One-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    /// Creates a page selector; zero values are clamped to one.
    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(self) -> usize {
        self.per_page
    }

    const fn offset(self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Write operations reserved for administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Creating a task.
    Create,
    /// Updating a task.
    Update,
    /// Deleting a task.
    Delete,
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Service-level errors for the task write path.
#[derive(Debug, Error)]
pub enum TaskAssignmentError {
    /// The actor may not perform the action; nothing was written.
    #[error("Only administrators can {0} tasks.")]
    Forbidden(TaskAction),
    /// The request failed field validation; nothing was written.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// The addressed task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Status or user lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Availability cleanup failed.
    #[error(transparent)]
    Availability(#[from] AvailabilityRepositoryError),
}

impl TaskAssignmentError {
    /// Returns the validation errors when this is a validation failure.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for task write-path operations.
pub type TaskAssignmentResult<T> = Result<T, TaskAssignmentError>;

/// Collaborators owned by other contexts that the write path drives after a
/// successful commit.
#[derive(Clone)]
pub struct AssignmentCollaborators {
    /// Availability rows, cleared before a task is deleted.
    pub availability: Arc<dyn AvailabilityRepository>,
    /// Deferred availability regeneration.
    pub queue: Arc<dyn MaterializationQueue>,
    /// Assignment notification transport.
    pub notifier: Arc<dyn AssignmentNotifier>,
}

/// Task write-path orchestration service.
#[derive(Clone)]
pub struct TaskAssignmentService<R, S, U, C>
where
    R: TaskRepository,
    S: TaskStatusRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    statuses: Arc<S>,
    users: Arc<U>,
    collaborators: AssignmentCollaborators,
    clock: Arc<C>,
    overlap: OverlapChecker<R>,
    policy: OverlapCheckPolicy,
}

/// Validated request plus the status it resolved to.
struct ValidatedInput {
    fields: NewTask,
    status: TaskStatus,
}

impl<R, S, U, C> TaskAssignmentService<R, S, U, C>
where
    R: TaskRepository,
    S: TaskStatusRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task assignment service with the default
    /// [`OverlapCheckPolicy::OnChange`] policy.
    #[must_use]
    pub fn new(
        tasks: Arc<R>,
        statuses: Arc<S>,
        users: Arc<U>,
        collaborators: AssignmentCollaborators,
        clock: Arc<C>,
    ) -> Self {
        let overlap = OverlapChecker::new(Arc::clone(&tasks));
        Self {
            tasks,
            statuses,
            users,
            collaborators,
            clock,
            overlap,
            policy: OverlapCheckPolicy::default(),
        }
    }

    /// Sets when updates re-run the overlap check.
    #[must_use]
    pub const fn with_overlap_policy(mut self, policy: OverlapCheckPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Creates and assigns a task.
    ///
    /// After the task is stored its availability is queued for
    /// materialisation and the assignee is notified. Neither side effect can
    /// fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAssignmentError::Forbidden`] for non-admin actors,
    /// [`TaskAssignmentError::Validation`] for invalid input or a schedule
    /// overlapping another task of the assignee, and repository errors when
    /// persistence fails.
    pub async fn create(&self, actor: &Actor, input: TaskInput) -> TaskAssignmentResult<Task> {
        authorize(actor, TaskAction::Create)?;
        let ValidatedInput { fields, status } = self.validate(input).await?;

        self.reject_overlap(fields.user_id, fields.schedule, None)
            .await?;

        let task = Task::new(fields, &*self.clock);
        self.tasks
            .store(&task)
            .await
            .map_err(overlap_as_validation)?;
        tracing::info!(
            task_id = %task.id(),
            user_id = %task.user_id(),
            schedule = %task.schedule(),
            "task created"
        );

        self.schedule_materialization(task.id()).await;
        self.announce(&task, &status, false).await;
        Ok(task)
    }

    /// Replaces every editable field of a task.
    ///
    /// Availability is always re-queued. The assignee is notified only when
    /// the task moved to a different user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAssignmentError::Forbidden`] for non-admin actors,
    /// [`TaskAssignmentError::NotFound`] for unknown tasks,
    /// [`TaskAssignmentError::Validation`] for invalid input or overlaps, and
    /// repository errors when persistence fails.
    pub async fn update(
        &self,
        actor: &Actor,
        task_id: TaskId,
        input: TaskInput,
    ) -> TaskAssignmentResult<Task> {
        authorize(actor, TaskAction::Update)?;
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskAssignmentError::NotFound(task_id))?;
        let ValidatedInput { fields, status } = self.validate(input).await?;

        let pending = task.revision_for(&fields);
        if self.policy == OverlapCheckPolicy::Always || pending.affects_occupancy() {
            self.reject_overlap(fields.user_id, fields.schedule, Some(task_id))
                .await?;
        }

        let previous_user = task.user_id();
        let revision = task.revise(fields, &*self.clock);
        self.tasks
            .update(&task)
            .await
            .map_err(overlap_as_validation)?;
        tracing::info!(
            task_id = %task.id(),
            user_id = %task.user_id(),
            previous_user_id = %previous_user,
            user_changed = revision.user_changed,
            schedule_changed = revision.schedule_changed,
            "task updated"
        );

        self.schedule_materialization(task.id()).await;
        if revision.user_changed {
            self.announce(&task, &status, true).await;
        }
        Ok(task)
    }

    /// Deletes a task after removing its availability rows.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAssignmentError::Forbidden`] for non-admin actors,
    /// [`TaskAssignmentError::NotFound`] for unknown tasks, and repository
    /// errors when persistence fails.
    pub async fn delete(&self, actor: &Actor, task_id: TaskId) -> TaskAssignmentResult<()> {
        authorize(actor, TaskAction::Delete)?;
        if self.tasks.find_by_id(task_id).await?.is_none() {
            return Err(TaskAssignmentError::NotFound(task_id));
        }

        let removed = self
            .collaborators
            .availability
            .remove_for_task(task_id)
            .await?;
        self.tasks.delete(task_id).await.map_err(|err| match err {
            TaskRepositoryError::NotFound(id) => TaskAssignmentError::NotFound(id),
            other => TaskAssignmentError::Repository(other),
        })?;
        tracing::info!(task_id = %task_id, removed_availability = removed, "task deleted");
        Ok(())
    }

    /// Lists tasks visible to the actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAssignmentError::Repository`] when the lookup fails.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: TaskFilter,
        page: PageRequest,
    ) -> TaskAssignmentResult<TaskPage> {
        let user_id = if actor.is_admin() {
            filter.user_id
        } else {
            Some(actor.user_id())
        };
        let search = filter
            .search
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        let query = TaskQuery {
            user_id,
            status_id: filter.status_id,
            search,
            offset: page.offset(),
            limit: page.per_page(),
        };
        Ok(self.tasks.list(&query).await?)
    }

    async fn validate(&self, input: TaskInput) -> TaskAssignmentResult<ValidatedInput> {
        let TaskInput {
            title,
            description,
            start_date,
            end_date,
            user_id,
            status_id,
        } = input;
        let mut errors = ValidationErrors::new();

        let valid_title = TaskTitle::new(title)
            .map_err(|err| errors.push(TaskField::Title, title_message(&err)))
            .ok();
        let valid_schedule = DateRange::new(start_date, end_date)
            .map_err(|_| {
                errors.push(
                    TaskField::EndDate,
                    "The end date field must be a date after or equal to start date.",
                );
            })
            .ok();
        if self.users.find_by_id(user_id).await?.is_none() {
            errors.push(TaskField::UserId, "The selected user id is invalid.");
        }
        let known_status = self.statuses.find_by_id(status_id).await?;
        if known_status.is_none() {
            errors.push(TaskField::StatusId, "The selected status id is invalid.");
        }

        match (valid_title, valid_schedule, known_status) {
            (Some(title), Some(schedule), Some(status)) if errors.is_empty() => {
                Ok(ValidatedInput {
                    fields: NewTask {
                        title,
                        description,
                        schedule,
                        user_id,
                        status_id,
                    },
                    status,
                })
            }
            _ => Err(TaskAssignmentError::Validation(errors)),
        }
    }

    async fn reject_overlap(
        &self,
        user_id: UserId,
        schedule: DateRange,
        exclude: Option<TaskId>,
    ) -> TaskAssignmentResult<()> {
        if let Some(conflict) = self.overlap.find_conflict(user_id, schedule, exclude).await? {
            tracing::debug!(
                user_id = %user_id,
                conflicting_task_id = %conflict.id(),
                requested = %schedule,
                "rejected overlapping assignment"
            );
            return Err(TaskAssignmentError::Validation(ValidationErrors::single(
                TaskField::UserId,
                OVERLAP_MESSAGE,
            )));
        }
        Ok(())
    }

    async fn schedule_materialization(&self, task_id: TaskId) {
        if let Err(err) = self.collaborators.queue.enqueue(task_id).await {
            tracing::error!(
                task_id = %task_id,
                error = %err,
                "failed to queue availability materialization"
            );
        }
    }

    async fn announce(&self, task: &Task, status: &TaskStatus, reassigned: bool) {
        let notification = AssignmentNotification::new(task, status, reassigned, self.clock.utc());
        if let Err(err) = self.collaborators.notifier.notify(&notification).await {
            tracing::warn!(
                task_id = %task.id(),
                channel = %notification.channel(),
                error = %err,
                "failed to deliver assignment notification"
            );
        }
    }
}

const fn authorize(actor: &Actor, action: TaskAction) -> TaskAssignmentResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(TaskAssignmentError::Forbidden(action))
    }
}

fn title_message(err: &TaskDomainError) -> String {
    match err {
        TaskDomainError::TitleTooLong(_) => {
            "The title field must not be greater than 255 characters.".to_owned()
        }
        _ => "The title field is required.".to_owned(),
    }
}

/// Maps the storage-level overlap backstop onto the same field error the
/// application-level check reports.
fn overlap_as_validation(err: TaskRepositoryError) -> TaskAssignmentError {
    match err {
        TaskRepositoryError::OverlappingSchedule(_) => TaskAssignmentError::Validation(
            ValidationErrors::single(TaskField::UserId, OVERLAP_MESSAGE),
        ),
        other => TaskAssignmentError::Repository(other),
    }
}
