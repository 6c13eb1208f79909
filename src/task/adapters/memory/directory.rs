//! In-memory status catalogue and user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{TaskStatus, TaskStatusId, UserAccount, UserId},
    ports::{DirectoryError, DirectoryResult, TaskStatusRepository, UserDirectory},
};

fn poisoned(err: &impl ToString) -> DirectoryError {
    DirectoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Thread-safe in-memory status catalogue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStatusRepository {
    statuses: Arc<RwLock<HashMap<TaskStatusId, TaskStatus>>>,
}

impl InMemoryTaskStatusRepository {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStatusRepository for InMemoryTaskStatusRepository {
    async fn store(&self, status: &TaskStatus) -> DirectoryResult<()> {
        let mut statuses = self.statuses.write().map_err(|err| poisoned(&err))?;
        let duplicate = statuses.contains_key(&status.id())
            || statuses.values().any(|existing| existing.name() == status.name());
        if duplicate {
            return Err(DirectoryError::Duplicate(format!(
                "task status '{}'",
                status.name()
            )));
        }
        statuses.insert(status.id(), status.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskStatusId) -> DirectoryResult<Option<TaskStatus>> {
        let statuses = self.statuses.read().map_err(|err| poisoned(&err))?;
        Ok(statuses.get(&id).cloned())
    }

    async fn list(&self) -> DirectoryResult<Vec<TaskStatus>> {
        let statuses = self.statuses.read().map_err(|err| poisoned(&err))?;
        let mut all: Vec<TaskStatus> = statuses.values().cloned().collect();
        all.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(all)
    }
}

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn store(&self, user: &UserAccount) -> DirectoryResult<()> {
        let mut users = self.users.write().map_err(|err| poisoned(&err))?;
        let duplicate = users.contains_key(&user.id())
            || users.values().any(|existing| existing.email() == user.email());
        if duplicate {
            return Err(DirectoryError::Duplicate(format!("user '{}'", user.email())));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<UserAccount>> {
        let users = self.users.read().map_err(|err| poisoned(&err))?;
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> DirectoryResult<Vec<UserAccount>> {
        let users = self.users.read().map_err(|err| poisoned(&err))?;
        let mut all: Vec<UserAccount> = users.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }
}
