//! Shared fixtures for unit tests across contexts.

mod clock;

pub use clock::{FixedClock, day};

use crate::availability::{
    adapters::memory::InMemoryAvailabilityRepository,
    ports::{MaterializationQueue, QueueError},
    services::AvailabilityMaterializer,
};
use crate::notification::adapters::RecordingNotifier;
use crate::task::{
    adapters::memory::{
        InMemoryTaskRepository, InMemoryTaskStatusRepository, InMemoryUserDirectory,
    },
    domain::{ActorRole, DateRange, EmailAddress, TaskId, TaskStatus, UserAccount},
    ports::{TaskStatusRepository, UserDirectory},
    services::{AssignmentCollaborators, TaskAssignmentService},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub fn span(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
    DateRange::new(day(start.0, start.1, start.2), day(end.0, end.1, end.2))
        .expect("ordered range")
}

/// Queue that records task IDs instead of materialising.
#[derive(Debug, Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<TaskId>>,
}

impl RecordingQueue {
    pub fn jobs(&self) -> Vec<TaskId> {
        self.jobs.lock().expect("queue lock").clone()
    }
}

#[async_trait]
impl MaterializationQueue for RecordingQueue {
    async fn enqueue(&self, task_id: TaskId) -> Result<(), QueueError> {
        self.jobs.lock().expect("queue lock").push(task_id);
        Ok(())
    }
}

pub type TestAssignmentService = TaskAssignmentService<
    InMemoryTaskRepository,
    InMemoryTaskStatusRepository,
    InMemoryUserDirectory,
    FixedClock,
>;

pub type TestMaterializer =
    AvailabilityMaterializer<InMemoryTaskRepository, InMemoryAvailabilityRepository, FixedClock>;

/// In-memory stores seeded with an administrator, two members and the
/// default status catalogue.
pub struct Harness {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub statuses: Arc<InMemoryTaskStatusRepository>,
    pub users: Arc<InMemoryUserDirectory>,
    pub availability: Arc<InMemoryAvailabilityRepository>,
    pub queue: Arc<RecordingQueue>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
    pub admin: UserAccount,
    pub alice: UserAccount,
    pub bob: UserAccount,
    pub catalogue: Vec<TaskStatus>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_tasks(InMemoryTaskRepository::new()).await
    }

    pub async fn with_tasks(tasks: InMemoryTaskRepository) -> Self {
        let users = InMemoryUserDirectory::new();
        let admin = account(&users, "Admin User", "admin@example.com", ActorRole::Admin).await;
        let alice = account(&users, "Alice", "alice@example.com", ActorRole::Member).await;
        let bob = account(&users, "Bob", "bob@example.com", ActorRole::Member).await;

        let statuses = InMemoryTaskStatusRepository::new();
        let catalogue = TaskStatus::default_catalogue().expect("valid catalogue");
        for status in &catalogue {
            statuses.store(status).await.expect("store status");
        }

        Self {
            tasks: Arc::new(tasks),
            statuses: Arc::new(statuses),
            users: Arc::new(users),
            availability: Arc::new(InMemoryAvailabilityRepository::new()),
            queue: Arc::new(RecordingQueue::default()),
            notifier: Arc::new(RecordingNotifier::new()),
            clock: Arc::new(FixedClock::at(2024, 1, 1)),
            admin,
            alice,
            bob,
            catalogue,
        }
    }

    pub fn status(&self, name: &str) -> &TaskStatus {
        self.catalogue
            .iter()
            .find(|status| status.name().as_str() == name)
            .expect("status in catalogue")
    }

    pub fn collaborators(&self) -> AssignmentCollaborators {
        AssignmentCollaborators {
            availability: self.availability.clone(),
            queue: self.queue.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn service(&self) -> TestAssignmentService {
        self.service_with(self.collaborators())
    }

    pub fn service_with(&self, collaborators: AssignmentCollaborators) -> TestAssignmentService {
        TaskAssignmentService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.statuses),
            Arc::clone(&self.users),
            collaborators,
            Arc::clone(&self.clock),
        )
    }

    pub fn materializer(&self) -> TestMaterializer {
        AvailabilityMaterializer::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.availability),
            Arc::clone(&self.clock),
        )
    }
}

async fn account(
    users: &InMemoryUserDirectory,
    name: &str,
    email: &str,
    role: ActorRole,
) -> UserAccount {
    let address = EmailAddress::new(email).expect("valid email");
    let user = UserAccount::new(name, address, role).expect("valid account");
    users.store(&user).await.expect("store user");
    user
}
