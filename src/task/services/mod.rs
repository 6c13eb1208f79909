//! Application services for task assignment.

mod assignment;
mod overlap;
mod validation;

pub use assignment::{
    AssignmentCollaborators, PageRequest, TaskAction, TaskAssignmentError, TaskAssignmentResult,
    TaskAssignmentService, TaskFilter, TaskInput,
};
pub use overlap::{OverlapCheckPolicy, OverlapChecker, ParseOverlapPolicyError};
pub use validation::{FieldError, OVERLAP_MESSAGE, TaskField, ValidationErrors};
