use std::collections::HashMap;

use chrono::{DateTime, Utc};
use qz_srs::{AdaptiveLevel, LevelChange, ReviewState, Subject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SessionStatus;

/// Report of a study session, as shown on the stats dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub subject: Option<Subject>,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Responses submitted during the session
    pub answered: u32,
    pub correct: u32,
    /// Share of correct responses, 0 when nothing was answered
    pub memory_retention: f64,
    /// Mean encoding strength of the questions answered, after their last answer
    pub mean_encoding_strength: f64,
    pub promotions: u32,
    pub demotions: u32,
    /// Highest level any answered question reached
    pub level: Option<AdaptiveLevel>,
}

/// Running counters of one session.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionTally {
    answered: u32,
    correct: u32,
    promotions: u32,
    demotions: u32,
    latest_strength: HashMap<Uuid, f64>,
    highest_level: Option<AdaptiveLevel>,
}

impl SessionTally {
    pub(crate) fn record(&mut self, correct: bool, change: LevelChange, state: &ReviewState) {
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
        match change {
            LevelChange::Promoted => self.promotions += 1,
            LevelChange::Demoted => self.demotions += 1,
            LevelChange::Unchanged => {}
        }
        self.latest_strength
            .insert(state.question_id, state.encoding_strength);
        self.highest_level = self.highest_level.max(Some(state.level));
    }

    pub(crate) fn forget(&mut self, question_id: &Uuid) {
        self.latest_strength.remove(question_id);
    }

    pub(crate) fn summarize(
        &self,
        session_id: Uuid,
        subject: Option<Subject>,
        status: SessionStatus,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> SessionSummary {
        let memory_retention = if self.answered == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.answered)
        };
        let mean_encoding_strength = if self.latest_strength.is_empty() {
            0.0
        } else {
            self.latest_strength.values().sum::<f64>() / self.latest_strength.len() as f64
        };

        SessionSummary {
            session_id,
            subject,
            status,
            started_at,
            ended_at,
            answered: self.answered,
            correct: self.correct,
            memory_retention,
            mean_encoding_strength,
            promotions: self.promotions,
            demotions: self.demotions,
            level: self.highest_level,
        }
    }
}
