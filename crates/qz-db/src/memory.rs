use std::collections::HashMap;

use chrono::{DateTime, Utc};
use qz_srs::{ReviewState, Subject};
use uuid::Uuid;

use crate::{ReviewStore, StoreError};

/// Process-local store. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryReviewStore {
    states: HashMap<Uuid, ReviewState>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn sorted(mut states: Vec<ReviewState>) -> Vec<ReviewState> {
        states.sort_by(|a, b| {
            a.next_review_at
                .cmp(&b.next_review_at)
                .then_with(|| a.question_id.cmp(&b.question_id))
        });
        states
    }
}

impl FromIterator<ReviewState> for MemoryReviewStore {
    fn from_iter<I: IntoIterator<Item = ReviewState>>(iter: I) -> Self {
        Self {
            states: iter
                .into_iter()
                .map(|state| (state.question_id, state))
                .collect(),
        }
    }
}

impl ReviewStore for MemoryReviewStore {
    async fn get(&self, question_id: Uuid) -> Result<Option<ReviewState>, StoreError> {
        Ok(self.states.get(&question_id).cloned())
    }

    async fn upsert(&mut self, state: &ReviewState) -> Result<(), StoreError> {
        self.states.insert(state.question_id, state.clone());
        Ok(())
    }

    async fn remove(&mut self, question_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.states.remove(&question_id).is_some())
    }

    async fn all_due(&self, now: DateTime<Utc>) -> Result<Vec<ReviewState>, StoreError> {
        Ok(Self::sorted(
            self.states
                .values()
                .filter(|state| state.is_due(now))
                .cloned()
                .collect(),
        ))
    }

    async fn load(&self, subject: Option<Subject>) -> Result<Vec<ReviewState>, StoreError> {
        Ok(Self::sorted(
            self.states
                .values()
                .filter(|state| subject.is_none_or(|s| state.subject == s))
                .cloned()
                .collect(),
        ))
    }
}
