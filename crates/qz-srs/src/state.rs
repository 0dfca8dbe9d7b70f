use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AdaptiveLevel, InvalidStateError, Subject};

/// Encoding strength given to a question the first time it is studied.
pub const INITIAL_ENCODING_STRENGTH: f64 = 0.5;

/// Scheduling record for one (question, learner) pair.
///
/// Only the scheduler engine produces new values of this type after creation;
/// the store persists them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Question this record schedules (the question itself is owned by the provider)
    pub question_id: Uuid,
    /// Subject of the question, used to load subject-filtered pools
    pub subject: Subject,
    /// Retention proxy, always within [0, 1]
    pub encoding_strength: f64,
    /// Days until the next scheduled review, always > 0
    pub current_interval_days: f64,
    /// When the question is next due, stored as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    pub level: AdaptiveLevel,
    /// Correct answers since the last miss or promotion
    pub consecutive_correct: u32,
}

impl ReviewState {
    /// Create the state for a question studied for the first time.
    ///
    /// Fresh states start at Beginner with the Beginner base interval and are
    /// due immediately.
    pub fn new(question_id: Uuid, subject: Subject, now: DateTime<Utc>) -> Self {
        let level = AdaptiveLevel::Beginner;
        Self {
            question_id,
            subject,
            encoding_strength: INITIAL_ENCODING_STRENGTH,
            current_interval_days: level.base_interval_days(),
            next_review_at: now,
            level,
            consecutive_correct: 0,
        }
    }

    /// Check the invariants the scheduler relies on.
    ///
    /// NaN fails both checks.
    pub fn validate(&self) -> Result<(), InvalidStateError> {
        if !(0.0..=1.0).contains(&self.encoding_strength) {
            return Err(InvalidStateError::EncodingStrengthOutOfRange(
                self.encoding_strength,
            ));
        }
        if !(self.current_interval_days.is_finite() && self.current_interval_days > 0.0) {
            return Err(InvalidStateError::NonPositiveInterval(
                self.current_interval_days,
            ));
        }
        Ok(())
    }

    /// Whether the question should be reviewed at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_state_defaults() {
        let state = ReviewState::new(Uuid::new_v4(), Subject::Finanza, now());
        assert_eq!(state.encoding_strength, 0.5);
        assert_eq!(state.level, AdaptiveLevel::Beginner);
        assert_eq!(state.current_interval_days, 1.0);
        assert_eq!(state.consecutive_correct, 0);
        assert!(state.is_due(now()));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_strength() {
        let mut state = ReviewState::new(Uuid::new_v4(), Subject::Altro, now());
        state.encoding_strength = 1.2;
        assert_eq!(
            state.validate(),
            Err(InvalidStateError::EncodingStrengthOutOfRange(1.2))
        );

        state.encoding_strength = f64::NAN;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_interval() {
        let mut state = ReviewState::new(Uuid::new_v4(), Subject::Altro, now());
        state.current_interval_days = 0.0;
        assert_eq!(
            state.validate(),
            Err(InvalidStateError::NonPositiveInterval(0.0))
        );

        state.current_interval_days = -3.0;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_next_review_serializes_as_epoch_millis() {
        let state = ReviewState::new(Uuid::nil(), Subject::Marketing, now());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["next_review_at"], now().timestamp_millis());
        assert_eq!(json["level"], "beginner");
        assert_eq!(json["subject"], "marketing");

        let back: ReviewState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
