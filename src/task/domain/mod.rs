//! Domain model for task assignment.
//!
//! Tasks assign a single user to an inclusive range of calendar days. The
//! domain keeps validation and interval arithmetic free of infrastructure so
//! the overlap decision can be tested in isolation.

mod actor;
mod date_range;
mod error;
mod ids;
mod status;
mod task;
mod user;

pub use actor::{Actor, ActorRole};
pub use date_range::{DateRange, DateRangeDays};
pub use error::{ParseActorRoleError, TaskDomainError};
pub use ids::{TaskId, TaskStatusId, UserId};
pub use status::{StatusColor, StatusName, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges, TaskRevision, TaskTitle};
pub use user::{EmailAddress, UserAccount};
