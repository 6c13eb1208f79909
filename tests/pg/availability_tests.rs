//! Availability adapter and end-to-end materialisation tests against
//! `PostgreSQL`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::pg::helpers::{BoxError, PgContext, clock, context, task_for, test_runtime};
use crate::test_helpers::day;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Timestamptz, Uuid as SqlUuid};
use rstest::rstest;
use taskboard::availability::{
    adapters::postgres::PostgresAvailabilityRepository,
    domain::{TaskSpan, UserAvailability},
    ports::{AvailabilityRepository, AvailabilityRepositoryError},
    services::{AvailabilityMaterializer, InlineMaterializationQueue, RetryPolicy},
};
use taskboard::notification::adapters::RecordingNotifier;
use taskboard::task::{
    domain::{Actor, ActorRole, DateRange, EmailAddress, UserAccount},
    ports::{TaskRepository, UserDirectory},
    services::{AssignmentCollaborators, TaskAssignmentService, TaskInput},
};

fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
    DateRange::new(day(start.0, start.1, start.2), day(end.0, end.1, end.2)).expect("ordered range")
}

fn dates(rows: &[UserAvailability]) -> Vec<chrono::NaiveDate> {
    rows.iter().map(UserAvailability::date).collect()
}

#[derive(diesel::QueryableByName)]
struct LockWaiters {
    #[diesel(sql_type = BigInt)]
    waiting: i64,
}

/// Blocks until some backend in the database is waiting on a row lock.
fn wait_for_lock_waiter(url: &str) -> Result<(), BoxError> {
    let mut observer = PgConnection::establish(url)?;
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let waiters = diesel::sql_query(concat!(
            "SELECT COUNT(*) AS waiting FROM pg_stat_activity ",
            "WHERE datname = current_database() AND wait_event_type = 'Lock'",
        ))
        .get_result::<LockWaiters>(&mut observer)?;
        if waiters.waiting > 0 {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    Err("no backend started waiting on the claimed day".into())
}

#[rstest]
fn regeneration_is_idempotent_and_first_writer_wins(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let current = task_for(&alice, status, "Current", range((2024, 1, 1), (2024, 1, 3)));
        let earlier = task_for(&alice, status, "Earlier", range((2024, 1, 4), (2024, 1, 5)));
        ctx.tasks.store(&current).await.expect("store task");
        ctx.tasks.store(&earlier).await.expect("store task");
        let repo = PostgresAvailabilityRepository::new(ctx.pool.clone());
        let at = clock().0;

        // Rows left over from the earlier task's previous, wider schedule.
        let stale = TaskSpan {
            task_id: earlier.id(),
            user_id: alice.id(),
            range: range((2024, 1, 2), (2024, 1, 5)),
        };
        repo.regenerate(&stale, at).await.expect("stale rows");

        let span = TaskSpan::from(&current);
        let first = repo.regenerate(&span, at).await.expect("first run");
        let second = repo.regenerate(&span, at).await.expect("second run");

        assert_eq!(first, second);
        assert_eq!(first.inserted, vec![day(2024, 1, 1)]);
        assert_eq!(first.skipped, vec![day(2024, 1, 2), day(2024, 1, 3)]);
        let rows = repo.find_for_task(current.id()).await.expect("rows");
        assert_eq!(dates(&rows), vec![day(2024, 1, 1)]);
        let held = repo
            .find_for_user_between(alice.id(), range((2024, 1, 1), (2024, 1, 31)))
            .await
            .expect("rows");
        assert_eq!(held.len(), 5);
    });
}

#[rstest]
fn deleting_a_task_cascades_to_availability(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let task = task_for(&alice, status, "Doomed", range((2024, 3, 1), (2024, 3, 2)));
        ctx.tasks.store(&task).await.expect("store task");
        let repo = PostgresAvailabilityRepository::new(ctx.pool.clone());
        repo.regenerate(&TaskSpan::from(&task), clock().0)
            .await
            .expect("regenerate");

        ctx.tasks.delete(task.id()).await.expect("delete task");

        assert!(repo.find_for_task(task.id()).await.expect("rows").is_empty());
    });
}

#[rstest]
fn assignment_service_materializes_through_postgres(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let bob = ctx.member("Bob").await.expect("member");
        let admin = UserAccount::new(
            "Admin User",
            EmailAddress::new("admin@example.com").expect("valid email"),
            ActorRole::Admin,
        )
        .expect("valid account");
        ctx.users.store(&admin).await.expect("store admin");

        let tasks = Arc::new(ctx.tasks.clone());
        let availability = Arc::new(PostgresAvailabilityRepository::new(ctx.pool.clone()));
        let fixed_clock = Arc::new(clock());
        let materializer = Arc::new(AvailabilityMaterializer::new(
            Arc::clone(&tasks),
            Arc::clone(&availability),
            Arc::clone(&fixed_clock),
        ));
        let service = TaskAssignmentService::new(
            tasks,
            Arc::new(ctx.statuses.clone()),
            Arc::new(ctx.users.clone()),
            AssignmentCollaborators {
                availability: availability.clone(),
                queue: Arc::new(InlineMaterializationQueue::new(
                    materializer,
                    RetryPolicy::new(2, Duration::from_millis(1)),
                )),
                notifier: Arc::new(RecordingNotifier::new()),
            },
            fixed_clock,
        );
        let actor = Actor::admin(admin.id());

        let task = service
            .create(
                &actor,
                TaskInput::new("Shift", day(2024, 5, 1), day(2024, 5, 3), alice.id(), status.id()),
            )
            .await
            .expect("create task");
        service
            .update(
                &actor,
                task.id(),
                TaskInput::new("Shift", day(2024, 5, 2), day(2024, 5, 2), bob.id(), status.id()),
            )
            .await
            .expect("reassign task");

        let rows = availability.find_for_task(task.id()).await.expect("rows");
        assert_eq!(dates(&rows), vec![day(2024, 5, 2)]);
        assert!(rows.iter().all(|row| row.user_id() == bob.id()));

        service.delete(&actor, task.id()).await.expect("delete task");
        assert!(availability.find_for_task(task.id()).await.expect("rows").is_empty());
    });
}

#[rstest]
fn racing_claim_on_the_same_day_is_reported_as_concurrent(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let current = task_for(&alice, status, "Current", range((2024, 6, 1), (2024, 6, 3)));
        let rival = task_for(&alice, status, "Rival", range((2024, 7, 1), (2024, 7, 1)));
        ctx.tasks.store(&current).await.expect("store task");
        ctx.tasks.store(&rival).await.expect("store task");

        // Another writer claims 2 June inside an open transaction.
        let mut rival_writer = PgConnection::establish(&ctx.url).expect("rival connection");
        rival_writer.batch_execute("BEGIN").expect("begin");
        diesel::sql_query(concat!(
            "INSERT INTO user_availabilities (id, user_id, task_id, date, created_at) ",
            "VALUES ($1, $2, $3, $4, $5)",
        ))
        .bind::<SqlUuid, _>(uuid::Uuid::new_v4())
        .bind::<SqlUuid, _>(alice.id().into_inner())
        .bind::<SqlUuid, _>(rival.id().into_inner())
        .bind::<Date, _>(day(2024, 6, 2))
        .bind::<Timestamptz, _>(clock().0)
        .execute(&mut rival_writer)
        .expect("uncommitted rival claim");

        let repo = PostgresAvailabilityRepository::new(ctx.pool.clone());
        let span = TaskSpan::from(&current);
        let pending = tokio::spawn(async move { repo.regenerate(&span, clock().0).await });

        let url = ctx.url.clone();
        tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
            wait_for_lock_waiter(&url)?;
            rival_writer.batch_execute("COMMIT")?;
            Ok(())
        })
        .await
        .expect("join rival writer")
        .expect("rival commits after regeneration blocks");

        let err = pending
            .await
            .expect("join regeneration")
            .expect_err("unique index fires");
        assert!(
            matches!(err, AvailabilityRepositoryError::ConcurrentClaim(id) if id == alice.id())
        );
        let survivor = ctx.tasks.find_by_id(current.id()).await.expect("lookup");
        assert!(survivor.is_some(), "task row is untouched by the failed regeneration");
        let availability = PostgresAvailabilityRepository::new(ctx.pool.clone());
        let rows = availability.find_for_task(current.id()).await.expect("rows");
        assert!(rows.is_empty());
    });
}
