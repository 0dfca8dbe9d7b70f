use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use qz_db::SqliteReviewStore;
use qz_study::{SessionStatus, StudyError, StudySession};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, metrics, validation};

use super::model::{
    NextQuestionResponse, ResponseOutcomeView, SessionView, StartSessionRequest,
    SubmitResponseRequest,
};

/// Create the study session routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/learners/{learner_id}/sessions", post(start_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/next", get(next_question))
        .route("/sessions/{id}/responses", post(submit_response))
        .route("/sessions/{id}/pause", post(pause_session))
        .route("/sessions/{id}/resume", post(resume_session))
        .route("/sessions/{id}/end", post(end_session))
        .route(
            "/sessions/{id}/questions/{question_id}",
            delete(archive_question),
        )
}

/// Start a study session for a learner
async fn start_session(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let subject = payload
        .subject
        .as_deref()
        .map(validation::parse_subject)
        .transpose()?;

    let store = SqliteReviewStore::new(state.pool.clone(), learner_id);
    let mut session = StudySession::new(store, state.bank.clone())
        .with_retry_policy(state.config.retry_policy());
    session.start(subject).await?;

    let handle = state.sessions.register(learner_id, session).await?;
    let session = handle.session.lock().await;
    metrics::record_session_events("started", 1);

    Ok((StatusCode::CREATED, Json(SessionView::new(learner_id, &session))))
}

async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.find(id).await?;
    let session = handle.session.lock().await;
    Ok(Json(SessionView::new(handle.learner_id, &session)))
}

/// Next question to review.
///
/// When nothing is due, falls back to a question of the session's subject
/// the learner has never studied.
async fn next_question(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NextQuestionResponse>, ApiError> {
    let handle = state.sessions.find(id).await?;
    let mut session = handle.session.lock().await;

    match session.next_question().await {
        Ok(item) => Ok(Json(NextQuestionResponse {
            question: item.question.into(),
            state: Some(item.state),
            fresh: false,
        })),
        Err(StudyError::NoQuestionDue) => {
            let fresh = state
                .bank
                .list(session.subject())
                .await
                .into_iter()
                .find(|q| !session.is_tracked(&q.id))
                .ok_or(StudyError::NoQuestionDue)?;

            tracing::debug!(session_id = %id, question_id = %fresh.id, "Nothing due, serving new question");
            Ok(Json(NextQuestionResponse {
                question: fresh.into(),
                state: None,
                fresh: true,
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// Grade and record a learner's answer
async fn submit_response(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitResponseRequest>,
) -> Result<Json<ResponseOutcomeView>, ApiError> {
    validation::validate_request(&payload)?;

    let handle = state.sessions.find(id).await?;
    let mut session = handle.session.lock().await;

    let outcome = session
        .submit_answer(payload.question_id, &payload.answer, payload.latency_ms)
        .await?;
    metrics::record_review(&outcome);

    let correct_answer = state
        .bank
        .get(payload.question_id)
        .await
        .map(|q| q.correct_answer);

    Ok(Json(ResponseOutcomeView::new(outcome, correct_answer)))
}

async fn pause_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.find(id).await?;
    let mut session = handle.session.lock().await;
    session.pause()?;
    Ok(Json(SessionView::new(handle.learner_id, &session)))
}

async fn resume_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.find(id).await?;
    let mut session = handle.session.lock().await;
    session.resume()?;
    Ok(Json(SessionView::new(handle.learner_id, &session)))
}

/// End a session. Ending an already completed session returns its summary again.
async fn end_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.find(id).await?;
    let mut session = handle.session.lock().await;

    if session.status() != SessionStatus::Completed {
        metrics::record_session_events("ended", 1);
    }
    session.end();

    Ok(Json(SessionView::new(handle.learner_id, &session)))
}

/// Remove a question from the learner's schedule
async fn archive_question(
    State(state): State<ApiState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let handle = state.sessions.find(id).await?;
    let mut session = handle.session.lock().await;

    if session.archive(question_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "Review state for question {question_id}"
        )))
    }
}
