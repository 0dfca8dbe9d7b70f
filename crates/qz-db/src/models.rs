use chrono::{DateTime, Utc};
use qz_srs::{AdaptiveLevel, ReviewState, Subject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StoreError;

/// Row of the `review_states` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewRow {
    /// Owner of the schedule
    pub learner_id: Uuid,
    /// Scheduled question
    pub question_id: Uuid,
    /// Subject name, lowercase
    pub subject: String,
    pub encoding_strength: f64,
    pub current_interval_days: f64,
    /// Unix epoch milliseconds
    pub next_review_at: i64,
    /// Level name, lowercase
    pub level: String,
    pub consecutive_correct: i64,
}

impl ReviewRow {
    pub fn from_state(learner_id: Uuid, state: &ReviewState) -> Self {
        Self {
            learner_id,
            question_id: state.question_id,
            subject: state.subject.as_str().to_string(),
            encoding_strength: state.encoding_strength,
            current_interval_days: state.current_interval_days,
            next_review_at: state.next_review_at.timestamp_millis(),
            level: state.level.as_str().to_string(),
            consecutive_correct: i64::from(state.consecutive_correct),
        }
    }
}

impl TryFrom<ReviewRow> for ReviewState {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt {
            question_id: row.question_id,
            reason,
        };

        let subject: Subject = row.subject.parse().map_err(|e| corrupt(format!("{e}")))?;
        let level: AdaptiveLevel = row.level.parse().map_err(corrupt)?;
        let next_review_at = DateTime::<Utc>::from_timestamp_millis(row.next_review_at)
            .ok_or_else(|| corrupt(format!("timestamp {} out of range", row.next_review_at)))?;
        let consecutive_correct = u32::try_from(row.consecutive_correct)
            .map_err(|_| corrupt(format!("streak {} out of range", row.consecutive_correct)))?;

        Ok(Self {
            question_id: row.question_id,
            subject,
            encoding_strength: row.encoding_strength,
            current_interval_days: row.current_interval_days,
            next_review_at,
            level,
            consecutive_correct,
        })
    }
}
