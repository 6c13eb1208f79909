//! In-memory task repository for tests and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{DateRange, Task, TaskId, UserId},
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// By default the repository rejects overlapping schedules for the same user,
/// mirroring the exclusion constraint of the `PostgreSQL` schema.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    enforce_exclusion: bool,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    user_index: HashMap<UserId, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository that enforces non-overlap on write.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            enforce_exclusion: true,
        }
    }

    /// Creates an empty repository that accepts overlapping schedules.
    ///
    /// Useful for reproducing data written before the constraint existed.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            state: Arc::default(),
            enforce_exclusion: false,
        }
    }

    fn write_state(
        &self,
    ) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_state(
        &self,
    ) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn check_exclusion(&self, state: &InMemoryTaskState, task: &Task) -> TaskRepositoryResult<()> {
        if !self.enforce_exclusion {
            return Ok(());
        }
        let schedule = task.schedule();
        let collides = tasks_for_user(state, task.user_id())
            .any(|other| other.id() != task.id() && other.schedule().overlaps(&schedule));
        if collides {
            return Err(TaskRepositoryError::OverlappingSchedule(task.user_id()));
        }
        Ok(())
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn tasks_for_user(state: &InMemoryTaskState, user_id: UserId) -> impl Iterator<Item = &Task> {
    state
        .user_index
        .get(&user_id)
        .into_iter()
        .flatten()
        .filter_map(|id| state.tasks.get(id))
}

fn index_user(state: &mut InMemoryTaskState, task: &Task) {
    state
        .user_index
        .entry(task.user_id())
        .or_default()
        .push(task.id());
}

/// Removes a task ID from the user index, cleaning up the entry if empty.
fn unindex_user(state: &mut InMemoryTaskState, user_id: UserId, task_id: TaskId) {
    if let Some(ids) = state.user_index.get_mut(&user_id) {
        ids.retain(|id| *id != task_id);
        if ids.is_empty() {
            state.user_index.remove(&user_id);
        }
    }
}

fn matches_query(task: &Task, query: &TaskQuery) -> bool {
    let user_matches = query.user_id.is_none_or(|user_id| task.user_id() == user_id);
    let status_matches = query
        .status_id
        .is_none_or(|status_id| task.status_id() == status_id);
    let search_matches = query.search.as_deref().is_none_or(|raw| {
        let needle = raw.to_lowercase();
        task.title().as_str().to_lowercase().contains(&needle)
            || task
                .description()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
    });
    user_matches && status_matches && search_matches
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        self.check_exclusion(&state, task)?;

        index_user(&mut state, task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        let previous_user = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .user_id();
        self.check_exclusion(&state, task)?;

        unindex_user(&mut state, previous_user, task.id());
        index_user(&mut state, task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        unindex_user(&mut state, removed.user_id(), id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = tasks_for_user(&state, user_id)
            .filter(|task| task.schedule().overlaps(&window))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| task.schedule().start());
        Ok(tasks)
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let state = self.read_state()?;
        let mut matching: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| matches_query(task, query))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        let total = matching.len();
        let tasks = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();
        Ok(TaskPage { tasks, total })
    }
}
