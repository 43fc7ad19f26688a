//! Errors returned by the service layer.

use thiserror::Error;

use crate::document::TaskIdError;

/// Failure of a service operation.
///
/// The HTTP layer maps each variant to a status code; only `NotFound`,
/// `Validation` and `Conflict` carry messages meant for the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A plan, week/day or task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request is malformed (bad task id, empty plan id, ...).
    #[error("{0}")]
    Validation(String),

    /// The plan id is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The feedback model call failed. Nothing was written.
    #[error("feedback model call failed: {0:#}")]
    Upstream(anyhow::Error),

    /// Storage or serialization failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn plan_not_found() -> Self {
        Self::NotFound("Plan not found".to_owned())
    }

    pub fn task_not_found() -> Self {
        Self::NotFound("Task not found in plan".to_owned())
    }
}

impl From<TaskIdError> for ServiceError {
    fn from(err: TaskIdError) -> Self {
        Self::Validation(err.to_string())
    }
}
