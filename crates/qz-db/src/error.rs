use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored review state for question {question_id} is corrupt: {reason}")]
    Corrupt { question_id: Uuid, reason: String },
}
