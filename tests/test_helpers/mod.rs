//! Shared wiring for integration tests.

#[path = "../../src/test_support/clock.rs"]
mod clock;

pub use clock::{FixedClock, day};

use std::sync::Arc;
use std::time::Duration;

use taskboard::availability::{
    adapters::memory::InMemoryAvailabilityRepository,
    services::{
        AvailabilityLookupService, AvailabilityMaterializer, InlineMaterializationQueue,
        RetryPolicy,
    },
};
use taskboard::notification::adapters::BroadcastNotifier;
use taskboard::task::{
    adapters::memory::{
        InMemoryTaskRepository, InMemoryTaskStatusRepository, InMemoryUserDirectory,
    },
    domain::{ActorRole, EmailAddress, TaskStatus, UserAccount},
    ports::{TaskStatusRepository, UserDirectory},
    services::{AssignmentCollaborators, TaskAssignmentService},
};

/// Assignment service wired entirely to in-memory adapters.
pub type MemoryAssignmentService = TaskAssignmentService<
    InMemoryTaskRepository,
    InMemoryTaskStatusRepository,
    InMemoryUserDirectory,
    FixedClock,
>;

/// In-memory stores with an inline materialisation queue and a broadcast
/// notifier.
pub struct MemoryStack {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub users: Arc<InMemoryUserDirectory>,
    pub availability: Arc<InMemoryAvailabilityRepository>,
    pub notifier: Arc<BroadcastNotifier>,
    pub service: MemoryAssignmentService,
    pub admin: UserAccount,
    pub catalogue: Vec<TaskStatus>,
}

impl MemoryStack {
    /// Seeds an administrator and the default status catalogue.
    pub async fn new() -> Self {
        let clock = Arc::new(FixedClock::at(2024, 1, 1));
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let statuses = Arc::new(InMemoryTaskStatusRepository::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let availability = Arc::new(InMemoryAvailabilityRepository::new());
        let notifier = Arc::new(BroadcastNotifier::default());

        let catalogue = TaskStatus::default_catalogue().expect("valid catalogue");
        for status in &catalogue {
            statuses.store(status).await.expect("store status");
        }
        let admin = UserAccount::new(
            "Admin User",
            EmailAddress::new("admin@example.com").expect("valid email"),
            ActorRole::Admin,
        )
        .expect("valid account");
        users.store(&admin).await.expect("store admin");

        let materializer = Arc::new(AvailabilityMaterializer::new(
            Arc::clone(&tasks),
            Arc::clone(&availability),
            Arc::clone(&clock),
        ));
        let queue = InlineMaterializationQueue::new(
            materializer,
            RetryPolicy::new(2, Duration::from_millis(1)),
        );
        let service = TaskAssignmentService::new(
            Arc::clone(&tasks),
            statuses,
            Arc::clone(&users),
            AssignmentCollaborators {
                availability: availability.clone(),
                queue: Arc::new(queue),
                notifier: notifier.clone(),
            },
            clock,
        );

        Self {
            tasks,
            users,
            availability,
            notifier,
            service,
            admin,
            catalogue,
        }
    }

    /// Registers a member account.
    pub async fn member(&self, name: &str, email: &str) -> UserAccount {
        let user = UserAccount::new(
            name,
            EmailAddress::new(email).expect("valid email"),
            ActorRole::Member,
        )
        .expect("valid account");
        self.users.store(&user).await.expect("store member");
        user
    }

    /// Returns the catalogue status with the given name.
    pub fn status(&self, name: &str) -> &TaskStatus {
        self.catalogue
            .iter()
            .find(|status| status.name().as_str() == name)
            .expect("status in catalogue")
    }

    /// Returns a lookup service over the stack's stores.
    pub fn lookup(
        &self,
    ) -> AvailabilityLookupService<InMemoryAvailabilityRepository, InMemoryUserDirectory> {
        AvailabilityLookupService::new(Arc::clone(&self.availability), Arc::clone(&self.users))
    }
}
