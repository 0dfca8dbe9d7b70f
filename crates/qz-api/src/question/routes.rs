use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use qz_study::Question;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, validation};

use super::model::{CreateQuestionRequest, ListQuestionsQuery};

/// Create the question catalog routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/questions", post(create_question).get(list_questions))
        .route("/questions/{id}", get(get_question))
}

/// Add a question to the catalog
async fn create_question(
    State(state): State<ApiState>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let question = payload.into_question()?;
    state.bank.insert(question.clone()).await;

    tracing::info!(
        question_id = %question.id,
        subject = %question.subject,
        "Question created"
    );

    Ok((StatusCode::CREATED, Json(question)))
}

/// Get a question by ID, answer key included
async fn get_question(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Question>, ApiError> {
    state
        .bank
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Question {id}")))
}

/// List questions, optionally of one subject
async fn list_questions(
    State(state): State<ApiState>,
    Query(query): Query<ListQuestionsQuery>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let subject = query
        .subject
        .as_deref()
        .map(validation::parse_subject)
        .transpose()?;

    Ok(Json(state.bank.list(subject).await))
}
