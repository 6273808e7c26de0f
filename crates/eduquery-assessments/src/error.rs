use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("{0}")]
    Validation(String),

    #[error("assessment not found: {0}")]
    NotFound(Uuid),

    #[error("submission not found: {0}")]
    SubmissionNotFound(Uuid),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Core(#[from] eduquery_core::error::CoreError),
}
