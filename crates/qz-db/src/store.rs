use std::future::Future;

use chrono::{DateTime, Utc};
use qz_srs::{ReviewState, Subject};
use uuid::Uuid;

use crate::StoreError;

/// Storage contract for one learner's review states.
///
/// A store instance belongs to exactly one learner and is written by a single
/// study session at a time, which is why writes take `&mut self`. Backends
/// must be read-your-writes: `get` after `upsert` on the same question returns
/// the written value.
pub trait ReviewStore: Send + Sync {
    /// Fetch the state of one question, if it has been studied.
    fn get(
        &self,
        question_id: Uuid,
    ) -> impl Future<Output = Result<Option<ReviewState>, StoreError>> + Send;

    /// Insert or overwrite the state for `state.question_id`.
    fn upsert(
        &mut self,
        state: &ReviewState,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove the state of an archived question. Returns whether it existed.
    fn remove(&mut self, question_id: Uuid)
    -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Every state due at `now`, ordered by `next_review_at` ascending.
    fn all_due(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<ReviewState>, StoreError>> + Send;

    /// Every state of the learner, or only those of `subject`.
    fn load(
        &self,
        subject: Option<Subject>,
    ) -> impl Future<Output = Result<Vec<ReviewState>, StoreError>> + Send;
}
