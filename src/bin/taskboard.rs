//! Operator CLI for the taskboard database.
//!
//! Usage:
//!
//! ```text
//! taskboard migrate
//! taskboard seed
//! taskboard materialize --task <task-id>
//! taskboard availability --user <user-id> --from 2026-01-01 --to 2026-01-31
//! ```
//!
//! Connection settings resolve from flags, `TASKBOARD_*` environment
//! variables and `~/.config/taskboard/config.toml`.

use chrono::{Days, NaiveDate};
use clap::{Parser, Subcommand};
use mockable::{Clock, DefaultClock};
use std::io::Write;
use std::sync::Arc;
use taskboard::availability::{
    adapters::postgres::PostgresAvailabilityRepository,
    services::{
        AvailabilityLookupService, AvailabilityMaterializer, InlineMaterializationQueue,
        materialize_with_retry,
    },
};
use taskboard::config::{ConfigArgs, TaskboardConfig};
use taskboard::notification::adapters::TracingNotifier;
use taskboard::postgres::{apply_migrations, build_pool};
use taskboard::task::{
    adapters::postgres::{
        PostgresTaskRepository, PostgresTaskStatusRepository, PostgresUserDirectory, TaskPgPool,
    },
    domain::{
        Actor, ActorRole, DateRange, EmailAddress, TaskId, TaskStatus, UserAccount, UserId,
    },
    ports::{TaskStatusRepository, UserDirectory},
    services::{AssignmentCollaborators, PageRequest, TaskAssignmentService, TaskFilter, TaskInput},
};
use thiserror::Error;
use uuid::Uuid;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Demo users created by `seed` besides the administrator.
const SEED_MEMBER_COUNT: usize = 5;
/// Tasks created per demo user, cycled.
const SEED_TASKS_PER_USER: [usize; 6] = [2, 0, 3, 1, 3, 2];
/// Task lengths in days, cycled.
const SEED_DURATIONS_DAYS: [u64; 5] = [3, 1, 5, 2, 4];
/// Free days between consecutive demo tasks, cycled.
const SEED_GAPS_DAYS: [u64; 3] = [1, 3, 2];

#[derive(Debug, Parser)]
#[command(version, about = "Taskboard operator tools")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the embedded schema migrations.
    Migrate,
    /// Insert the status catalogue, demo users and demo tasks.
    Seed,
    /// Regenerate availability rows for one task.
    Materialize {
        /// Task identifier.
        #[arg(long)]
        task: Uuid,
    },
    /// List a user's occupied days.
    Availability {
        /// User identifier.
        #[arg(long)]
        user: Uuid,
        /// First day of the window.
        #[arg(long)]
        from: NaiveDate,
        /// Last day of the window.
        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("date arithmetic overflowed while seeding")]
    DateOverflow,
}

type PgAssignmentService = TaskAssignmentService<
    PostgresTaskRepository,
    PostgresTaskStatusRepository,
    PostgresUserDirectory,
    DefaultClock,
>;
type PgMaterializer =
    AvailabilityMaterializer<PostgresTaskRepository, PostgresAvailabilityRepository, DefaultClock>;

/// Adapters wired over one connection pool.
struct Stores {
    tasks: Arc<PostgresTaskRepository>,
    statuses: Arc<PostgresTaskStatusRepository>,
    users: Arc<PostgresUserDirectory>,
    availability: Arc<PostgresAvailabilityRepository>,
    clock: Arc<DefaultClock>,
}

impl Stores {
    fn new(pool: &TaskPgPool) -> Self {
        Self {
            tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
            statuses: Arc::new(PostgresTaskStatusRepository::new(pool.clone())),
            users: Arc::new(PostgresUserDirectory::new(pool.clone())),
            availability: Arc::new(PostgresAvailabilityRepository::new(pool.clone())),
            clock: Arc::new(DefaultClock),
        }
    }

    fn materializer(&self) -> Arc<PgMaterializer> {
        Arc::new(AvailabilityMaterializer::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.availability),
            Arc::clone(&self.clock),
        ))
    }

    fn assignment_service(&self, config: &TaskboardConfig) -> PgAssignmentService {
        let collaborators = AssignmentCollaborators {
            availability: self.availability.clone(),
            queue: Arc::new(InlineMaterializationQueue::new(
                self.materializer(),
                config.retry,
            )),
            notifier: Arc::new(TracingNotifier),
        };
        TaskAssignmentService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.statuses),
            Arc::clone(&self.users),
            collaborators,
            Arc::clone(&self.clock),
        )
        .with_overlap_policy(config.overlap_policy)
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = TaskboardConfig::load(&cli.config)?;
    taskboard::telemetry::init(&config.log_level);

    let pool = build_pool(&config.database_url, config.pool_size)?;
    let stores = Stores::new(&pool);

    match cli.command {
        Command::Migrate => migrate(pool).await,
        Command::Seed => seed(&stores, &config).await,
        Command::Materialize { task } => materialize(&stores, &config, task).await,
        Command::Availability { user, from, to } => {
            availability(&stores, UserId::from_uuid(user), DateRange::new(from, to)?).await
        }
    }
}

async fn migrate(pool: TaskPgPool) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        let mut connection = pool.get()?;
        apply_migrations(&mut connection)?;
        Ok(())
    })
    .await??;
    writeln!(std::io::stdout(), "migrations applied")?;
    Ok(())
}

async fn materialize(
    stores: &Stores,
    config: &TaskboardConfig,
    task: Uuid,
) -> Result<(), BoxError> {
    let materializer = stores.materializer();
    let report =
        materialize_with_retry(&*materializer, config.retry, TaskId::from_uuid(task)).await?;
    writeln!(
        std::io::stdout(),
        "task {}: {} day(s) written, {} skipped",
        report.task_id,
        report.inserted.len(),
        report.skipped.len()
    )?;
    for day in &report.skipped {
        writeln!(std::io::stdout(), "  skipped {day}")?;
    }
    Ok(())
}

async fn availability(stores: &Stores, user: UserId, window: DateRange) -> Result<(), BoxError> {
    let lookup = AvailabilityLookupService::new(
        Arc::clone(&stores.availability),
        Arc::clone(&stores.users),
    );
    let rows = lookup.for_user_between(user, window).await?;
    let mut out = std::io::stdout().lock();
    for row in &rows {
        writeln!(out, "{} task {}", row.date(), row.task_id())?;
    }
    writeln!(out, "{} occupied day(s) in {window}", rows.len())?;
    Ok(())
}

async fn seed(stores: &Stores, config: &TaskboardConfig) -> Result<(), BoxError> {
    let statuses = seed_statuses(stores).await?;
    let (admin, members) = seed_users(stores).await?;
    let Some(initial_status) = statuses.first() else {
        return Ok(());
    };

    let service = stores.assignment_service(config);
    let actor = Actor::new(admin.id(), ActorRole::Admin);
    let today = stores.clock.utc().date_naive();
    let mut durations = SEED_DURATIONS_DAYS.iter().cycle();
    let mut gaps = SEED_GAPS_DAYS.iter().cycle();
    let mut created = 0_usize;

    for (member, task_count) in members.iter().zip(SEED_TASKS_PER_USER.iter().cycle()) {
        let existing = service
            .list(
                &actor,
                TaskFilter {
                    user_id: Some(member.id()),
                    ..TaskFilter::default()
                },
                PageRequest::new(1, 1),
            )
            .await?;
        if existing.total > 0 {
            continue;
        }

        let mut start = today;
        for number in 1..=*task_count {
            let length = durations.next().copied().unwrap_or(1);
            let gap = gaps.next().copied().unwrap_or(1);
            let end = start
                .checked_add_days(Days::new(length.saturating_sub(1)))
                .ok_or(CliError::DateOverflow)?;
            let input = TaskInput::new(
                format!("{} task {number}", member.name()),
                start,
                end,
                member.id(),
                initial_status.id(),
            )
            .with_description("Seeded demo assignment.");
            service.create(&actor, input).await?;
            created += 1;
            start = end
                .checked_add_days(Days::new(gap.saturating_add(1)))
                .ok_or(CliError::DateOverflow)?;
        }
    }

    writeln!(
        std::io::stdout(),
        "seeded {} status(es), {} user(s), {created} task(s)",
        statuses.len(),
        members.len().saturating_add(1)
    )?;
    Ok(())
}

/// Ensures the default catalogue exists and returns it, "To Do" first.
async fn seed_statuses(stores: &Stores) -> Result<Vec<TaskStatus>, BoxError> {
    let existing = stores.statuses.list().await?;
    let mut catalogue = Vec::new();
    for status in TaskStatus::default_catalogue()? {
        if let Some(found) = existing.iter().find(|known| known.name() == status.name()) {
            catalogue.push(found.clone());
        } else {
            stores.statuses.store(&status).await?;
            catalogue.push(status);
        }
    }
    Ok(catalogue)
}

/// Ensures the administrator and demo members exist.
async fn seed_users(stores: &Stores) -> Result<(UserAccount, Vec<UserAccount>), BoxError> {
    let admin = ensure_user(stores, "Admin User", "admin@example.com", ActorRole::Admin).await?;
    let mut members = Vec::with_capacity(SEED_MEMBER_COUNT);
    for number in 1..=SEED_MEMBER_COUNT {
        let member = ensure_user(
            stores,
            &format!("User {number}"),
            &format!("user{number}@example.com"),
            ActorRole::Member,
        )
        .await?;
        members.push(member);
    }
    Ok((admin, members))
}

async fn ensure_user(
    stores: &Stores,
    name: &str,
    email: &str,
    role: ActorRole,
) -> Result<UserAccount, BoxError> {
    let address = EmailAddress::new(email)?;
    let existing = stores.users.list().await?;
    if let Some(found) = existing.into_iter().find(|user| user.email() == &address) {
        return Ok(found);
    }
    let account = UserAccount::new(name, address, role)?;
    stores.users.store(&account).await?;
    Ok(account)
}
