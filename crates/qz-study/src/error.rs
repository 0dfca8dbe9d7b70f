use qz_db::StoreError;
use qz_srs::InvalidStateError;
use thiserror::Error;
use uuid::Uuid;

use crate::SessionStatus;

/// Failures of the question catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("question {0} does not exist")]
    NotFound(Uuid),
    /// Transient failure, worth retrying
    #[error("question provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("invalid review state: {0}")]
    InvalidState(#[from] InvalidStateError),
    /// Nothing in the pool is due. Recoverable: the caller may offer new material.
    #[error("no question is due for review")]
    NoQuestionDue,
    /// The session has ended and accepts no further calls.
    #[error("study session is closed")]
    SessionClosed,
    #[error("study session is {0}, not active")]
    NotActive(SessionStatus),
    #[error("cannot {action} a session that is {from}")]
    InvalidTransition {
        from: SessionStatus,
        action: &'static str,
    },
    #[error("question {question_id} unavailable after {attempts} attempt(s): {reason}")]
    QuestionUnavailable {
        question_id: Uuid,
        attempts: u32,
        reason: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
