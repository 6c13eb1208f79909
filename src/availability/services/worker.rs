//! Background and inline execution of availability materialisation.
//!
//! Jobs are accepted only after the triggering task write has committed, so
//! the materialiser always reads the committed task. Failures are retried
//! with doubling backoff up to a bounded number of attempts and never reach
//! the caller that enqueued the job.

use super::{AvailabilityMaterializer, MaterializeError};
use crate::availability::{
    domain::MaterializationReport,
    ports::{AvailabilityRepository, MaterializationQueue, QueueError},
};
use crate::task::{domain::TaskId, ports::TaskRepository};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Jobs buffered before `enqueue` waits for the worker.
const QUEUE_CAPACITY: usize = 1024;

/// Bounded retry schedule for materialisation jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy; at least one attempt is always made.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            initial_backoff,
        }
    }

    /// Returns the total number of attempts per job.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the wait before the first retry.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Returns the wait after failed attempt `attempt` (one-based).
    #[must_use]
    pub const fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Runs one materialisation job under `policy`.
///
/// # Errors
///
/// Returns the last [`MaterializeError`] when the job is not retryable or the
/// attempts are exhausted.
pub async fn materialize_with_retry<T, A, C>(
    materializer: &AvailabilityMaterializer<T, A, C>,
    policy: RetryPolicy,
    task_id: TaskId,
) -> Result<MaterializationReport, MaterializeError>
where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    let mut attempt = 1;
    loop {
        match materializer.materialize(task_id).await {
            Ok(report) => return Ok(report),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts() => {
                let wait = policy.backoff_after(attempt);
                tracing::warn!(
                    task_id = %task_id,
                    attempt,
                    backoff_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "availability materialization failed; retrying"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Queue handle feeding a background materialisation task.
///
/// Cloning the handle shares the queue. The worker exits once every handle
/// has been dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct MaterializationWorker {
    sender: mpsc::Sender<TaskId>,
}

impl MaterializationWorker {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// Returns the queue handle and the worker's join handle.
    #[must_use]
    pub fn spawn<T, A, C>(
        materializer: Arc<AvailabilityMaterializer<T, A, C>>,
        policy: RetryPolicy,
    ) -> (Self, JoinHandle<()>)
    where
        T: TaskRepository + 'static,
        A: AvailabilityRepository + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let handle = tokio::spawn(drain(materializer, policy, receiver));
        (Self { sender }, handle)
    }
}

async fn drain<T, A, C>(
    materializer: Arc<AvailabilityMaterializer<T, A, C>>,
    policy: RetryPolicy,
    mut receiver: mpsc::Receiver<TaskId>,
) where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    while let Some(task_id) = receiver.recv().await {
        match materialize_with_retry(&*materializer, policy, task_id).await {
            Ok(_) => {}
            Err(MaterializeError::TaskMissing(_)) => {
                tracing::info!(task_id = %task_id, "task deleted before materialization; skipping");
            }
            Err(err) => {
                tracing::error!(
                    task_id = %task_id,
                    attempts = policy.max_attempts(),
                    error = %err,
                    "availability materialization gave up; rows stay stale until the next write"
                );
            }
        }
    }
    tracing::debug!("materialization worker stopped");
}

#[async_trait]
impl MaterializationQueue for MaterializationWorker {
    async fn enqueue(&self, task_id: TaskId) -> Result<(), QueueError> {
        self.sender
            .send(task_id)
            .await
            .map_err(|_| QueueError::Closed)?;
        tracing::debug!(task_id = %task_id, "availability materialization queued");
        Ok(())
    }
}

/// Queue that materialises on the caller's task before returning.
///
/// Used by the operator CLI and tests where a background task would outlive
/// the command.
#[derive(Clone)]
pub struct InlineMaterializationQueue<T, A, C>
where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    materializer: Arc<AvailabilityMaterializer<T, A, C>>,
    policy: RetryPolicy,
}

impl<T, A, C> InlineMaterializationQueue<T, A, C>
where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    /// Creates an inline queue.
    #[must_use]
    pub const fn new(
        materializer: Arc<AvailabilityMaterializer<T, A, C>>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            materializer,
            policy,
        }
    }
}

#[async_trait]
impl<T, A, C> MaterializationQueue for InlineMaterializationQueue<T, A, C>
where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    async fn enqueue(&self, task_id: TaskId) -> Result<(), QueueError> {
        materialize_with_retry(&*self.materializer, self.policy, task_id)
            .await
            .map(|_| ())
            .map_err(|err| QueueError::Failed(err.to_string()))
    }
}
