use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qz_study::StudyError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Study(#[from] StudyError),
}

impl ApiError {
    /// HTTP status and machine-readable code of this error.
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Self::Study(err) => match err {
                StudyError::NoQuestionDue => (StatusCode::NOT_FOUND, "no_question_due"),
                StudyError::SessionClosed => (StatusCode::CONFLICT, "session_closed"),
                StudyError::NotActive(_) => (StatusCode::CONFLICT, "session_not_active"),
                StudyError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "invalid_transition")
                }
                StudyError::QuestionUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "question_unavailable")
                }
                StudyError::InvalidState(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_review_state")
                }
                StudyError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
