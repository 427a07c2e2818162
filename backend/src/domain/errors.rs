//! Error taxonomy shared by every planner operation.

/// Failure reported by a planner operation.
///
/// Storage code speaks `anyhow`; anything bubbling up from there lands in
/// `Persistence`, so services can use `?` on repository calls directly.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Caller does not own the child (or the child does not exist).
    #[error("Unauthorized: child {0} is not accessible to this caller")]
    Unauthorized(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Structural edits attempted while the plan is confirmed.
    #[error("Schedule is confirmed; unlock it before editing slots")]
    PlanLocked,
    #[error("{0} not found")]
    NotFound(String),
    /// Two slots claimed the same (day, time) cell.
    #[error("Schedule invariant violated: {0}")]
    Consistency(String),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl PlannerError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlannerError::Validation(message.into())
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
