//! Task and directory adapter tests against `PostgreSQL`.

use crate::pg::helpers::{BoxError, PgContext, context, task_for, test_runtime};
use crate::test_helpers::day;
use rstest::rstest;
use taskboard::task::{
    domain::{DateRange, TaskStatus},
    ports::{DirectoryError, TaskQuery, TaskRepository, TaskRepositoryError, TaskStatusRepository},
};

fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
    DateRange::new(day(start.0, start.1, start.2), day(end.0, end.1, end.2)).expect("ordered range")
}

#[rstest]
fn stored_task_round_trips(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let task = task_for(&alice, status, "Round trip", range((2024, 1, 1), (2024, 1, 3)));

        ctx.tasks.store(&task).await.expect("store task");
        let found = ctx
            .tasks
            .find_by_id(task.id())
            .await
            .expect("lookup")
            .expect("task present");

        assert_eq!(found.id(), task.id());
        assert_eq!(found.schedule(), task.schedule());
        assert_eq!(found.user_id(), alice.id());
        assert_eq!(found.title(), task.title());
    });
}

#[rstest]
fn exclusion_constraint_rejects_overlaps(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let first = task_for(&alice, status, "First", range((2024, 1, 1), (2024, 1, 5)));
        let overlapping = task_for(&alice, status, "Second", range((2024, 1, 5), (2024, 1, 9)));
        let adjacent = task_for(&alice, status, "Third", range((2024, 1, 6), (2024, 1, 9)));

        ctx.tasks.store(&first).await.expect("first task");
        let err = ctx
            .tasks
            .store(&overlapping)
            .await
            .expect_err("overlap rejected by the database");
        ctx.tasks.store(&adjacent).await.expect("adjacent task");

        assert!(matches!(err, TaskRepositoryError::OverlappingSchedule(id) if id == alice.id()));
    });
}

#[rstest]
fn listing_filters_search_and_pages(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let bob = ctx.member("Bob").await.expect("member");
        for (offset, title) in ["Audit 100%", "Audit 50", "Delivery"].into_iter().enumerate() {
            let start = u32::try_from(offset).expect("small offset") * 3 + 1;
            let schedule = range((2024, 2, start), (2024, 2, start + 1));
            let task = task_for(&alice, status, title, schedule);
            ctx.tasks.store(&task).await.expect("store task");
        }
        let bobs = task_for(&bob, status, "Audit for Bob", range((2024, 2, 1), (2024, 2, 2)));
        ctx.tasks.store(&bobs).await.expect("store task");

        let literal_percent = ctx
            .tasks
            .list(&TaskQuery {
                search: Some("100%".to_owned()),
                limit: 10,
                ..TaskQuery::default()
            })
            .await
            .expect("list");
        assert_eq!(literal_percent.total, 1);

        let alices_audits = ctx
            .tasks
            .list(&TaskQuery {
                user_id: Some(alice.id()),
                search: Some("audit".to_owned()),
                limit: 1,
                ..TaskQuery::default()
            })
            .await
            .expect("list");
        assert_eq!(alices_audits.total, 2);
        assert_eq!(alices_audits.tasks.len(), 1);
    });
}

#[rstest]
fn status_names_are_unique(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let existing = catalogue.first().expect("status");
        let clash = TaskStatus::new(existing.name().clone(), existing.color().clone());

        let err = ctx.statuses.store(&clash).await.expect_err("duplicate name");

        assert!(matches!(err, DirectoryError::Duplicate(_)));
        assert_eq!(ctx.statuses.list().await.expect("list").len(), catalogue.len());
    });
}

#[rstest]
fn pages_past_the_end_are_empty(context: Result<PgContext, BoxError>) {
    let ctx = context.expect("postgres context");
    test_runtime().block_on(async {
        let catalogue = ctx.catalogue().await.expect("catalogue");
        let status = catalogue.first().expect("status");
        let alice = ctx.member("Alice").await.expect("member");
        let task = task_for(&alice, status, "Only", range((2024, 4, 1), (2024, 4, 2)));
        ctx.tasks.store(&task).await.expect("store task");

        let page = ctx
            .tasks
            .list(&TaskQuery {
                offset: usize::MAX,
                limit: 20,
                ..TaskQuery::default()
            })
            .await
            .expect("out-of-range page still lists");

        assert!(page.tasks.is_empty());
        assert_eq!(page.total, 1);
    });
}
