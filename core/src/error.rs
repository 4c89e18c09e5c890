use thiserror::Error;

use crate::model::task::{Partition, TaskId};

/// Raised when raw due-time text cannot become a due timestamp.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidDueTime {
    #[error("could not understand due time `{0}`")]
    Unrecognized(String),

    #[error("`{0}` is not a valid date or time")]
    OutOfRange(String),

    #[error("due time in the past")]
    InPast,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddTaskError {
    #[error("missing description")]
    MissingDescription,

    #[error(transparent)]
    InvalidDueTime(#[from] InvalidDueTime),

    #[error(transparent)]
    Internal(#[from] InvariantViolation),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("task {id} not found among {partition} tasks")]
pub struct TaskNotFound {
    pub id: TaskId,
    pub partition: Partition,
}

/// Internal consistency failure. Points at a bug or a corrupted saved state,
/// never at user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invariant violated: {0}")]
pub struct InvariantViolation(pub String);
