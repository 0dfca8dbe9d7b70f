use qz_srs::{AdaptiveLevel, LevelChange, ReviewState, Subject};
use qz_study::{ReviewOutcome, SessionStatus, SessionSummary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::question::model::QuestionView;

use super::LearnerSession;

/// Body of `POST /v1/learners/{learner_id}/sessions`
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Restrict the session to one subject; every subject when absent
    #[serde(default)]
    pub subject: Option<String>,
}

/// Body of `POST /v1/sessions/{id}/responses`
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitResponseRequest {
    pub question_id: Uuid,
    /// Option id or free-text answer
    #[validate(length(max = 2000))]
    pub answer: String,
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub status: SessionStatus,
    pub subject: Option<Subject>,
    pub pool_size: usize,
    pub due_count: usize,
    pub summary: SessionSummary,
}

impl SessionView {
    pub fn new(learner_id: Uuid, session: &LearnerSession) -> Self {
        Self {
            id: session.id(),
            learner_id,
            status: session.status(),
            subject: session.subject(),
            pool_size: session.pool_size(),
            due_count: session.due_count(),
            summary: session.summary(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextQuestionResponse {
    pub question: QuestionView,
    /// Scheduling state, absent for a question never studied
    pub state: Option<ReviewState>,
    /// Nothing was due and this question is new material
    pub fresh: bool,
}

#[derive(Debug, Serialize)]
pub struct ResponseOutcomeView {
    pub question_id: Uuid,
    pub correct: bool,
    pub correct_answer: Option<String>,
    pub previous_level: AdaptiveLevel,
    pub level_change: LevelChange,
    pub recovered: bool,
    pub state: ReviewState,
}

impl ResponseOutcomeView {
    pub fn new(outcome: ReviewOutcome, correct_answer: Option<String>) -> Self {
        Self {
            question_id: outcome.state.question_id,
            correct: outcome.correct,
            correct_answer,
            previous_level: outcome.previous_level,
            level_change: outcome.level_change,
            recovered: outcome.recovered,
            state: outcome.state,
        }
    }
}
