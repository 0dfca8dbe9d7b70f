use chrono::{DateTime, Utc};
use qz_srs::{ReviewState, Subject};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{ReviewStore, StoreError, models::ReviewRow, repositories::review};

/// Review states of one learner persisted in the `review_states` table.
#[derive(Debug, Clone)]
pub struct SqliteReviewStore {
    pool: SqlitePool,
    learner_id: Uuid,
}

impl SqliteReviewStore {
    pub const fn new(pool: SqlitePool, learner_id: Uuid) -> Self {
        Self { pool, learner_id }
    }

    pub const fn learner_id(&self) -> Uuid {
        self.learner_id
    }

    /// Convert a row, logging and dropping it when it cannot be read back.
    ///
    /// A dropped row is treated as never studied; the next answer to that
    /// question overwrites it with a fresh state.
    fn read_row(&self, row: ReviewRow) -> Option<ReviewState> {
        match ReviewState::try_from(row) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(
                    learner_id = %self.learner_id,
                    error = %err,
                    "Skipping corrupt review state"
                );
                None
            }
        }
    }

    fn read_rows(&self, rows: Vec<ReviewRow>) -> Vec<ReviewState> {
        rows.into_iter()
            .filter_map(|row| self.read_row(row))
            .collect()
    }
}

impl ReviewStore for SqliteReviewStore {
    async fn get(&self, question_id: Uuid) -> Result<Option<ReviewState>, StoreError> {
        let row = review::get_review(&self.pool, self.learner_id, question_id).await?;
        Ok(row.and_then(|row| self.read_row(row)))
    }

    /// `updated_at` is stamped from the wall clock; it is audit data and never
    /// takes part in scheduling.
    async fn upsert(&mut self, state: &ReviewState) -> Result<(), StoreError> {
        let row = ReviewRow::from_state(self.learner_id, state);
        review::upsert_review(&self.pool, &row, Utc::now()).await?;
        Ok(())
    }

    async fn remove(&mut self, question_id: Uuid) -> Result<bool, StoreError> {
        Ok(review::delete_review(&self.pool, self.learner_id, question_id).await?)
    }

    async fn all_due(&self, now: DateTime<Utc>) -> Result<Vec<ReviewState>, StoreError> {
        let rows = review::list_due_reviews(&self.pool, self.learner_id, now).await?;
        Ok(self.read_rows(rows))
    }

    async fn load(&self, subject: Option<Subject>) -> Result<Vec<ReviewState>, StoreError> {
        let rows = review::list_reviews(&self.pool, self.learner_id, subject).await?;
        Ok(self.read_rows(rows))
    }
}
