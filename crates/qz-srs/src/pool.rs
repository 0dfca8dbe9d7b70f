use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ReviewState;

/// Review states of one learner, keyed by question and ordered by due date.
///
/// At most one state exists per question id: inserting a state for a known
/// question replaces the previous one and re-indexes it.
#[derive(Debug, Clone, Default)]
pub struct StudyPool {
    states: HashMap<Uuid, ReviewState>,
    // (next_review_at, question_id) for every entry of `states`
    due_index: BTreeSet<(DateTime<Utc>, Uuid)>,
}

impl StudyPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, question_id: &Uuid) -> Option<&ReviewState> {
        self.states.get(question_id)
    }

    pub fn contains(&self, question_id: &Uuid) -> bool {
        self.states.contains_key(question_id)
    }

    /// Insert or replace the state for its question, returning the previous one.
    pub fn upsert(&mut self, state: ReviewState) -> Option<ReviewState> {
        self.due_index.insert((state.next_review_at, state.question_id));
        let previous = self.states.insert(state.question_id, state);
        if let Some(old) = &previous {
            let current = &self.states[&old.question_id];
            if old.next_review_at != current.next_review_at {
                self.due_index.remove(&(old.next_review_at, old.question_id));
            }
        }
        previous
    }

    pub fn remove(&mut self, question_id: &Uuid) -> Option<ReviewState> {
        let removed = self.states.remove(question_id)?;
        self.due_index
            .remove(&(removed.next_review_at, removed.question_id));
        Some(removed)
    }

    /// All states, earliest `next_review_at` first. Equal timestamps are
    /// ordered by question id.
    pub fn iter_by_due(&self) -> impl Iterator<Item = &ReviewState> {
        self.due_index.iter().map(|(_, id)| &self.states[id])
    }

    /// States due at `now`, earliest first.
    pub fn due(&self, now: DateTime<Utc>) -> impl Iterator<Item = &ReviewState> {
        self.iter_by_due()
            .take_while(move |state| state.next_review_at <= now)
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.due(now).count()
    }
}

impl FromIterator<ReviewState> for StudyPool {
    fn from_iter<I: IntoIterator<Item = ReviewState>>(iter: I) -> Self {
        let mut pool = Self::new();
        for state in iter {
            pool.upsert(state);
        }
        pool
    }
}

impl Extend<ReviewState> for StudyPool {
    fn extend<I: IntoIterator<Item = ReviewState>>(&mut self, iter: I) {
        for state in iter {
            self.upsert(state);
        }
    }
}
