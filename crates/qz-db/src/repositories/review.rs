use chrono::{DateTime, Utc};
use qz_srs::Subject;
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::models::ReviewRow;

pub async fn get_review<'e, E>(
    executor: E,
    learner_id: Uuid,
    question_id: Uuid,
) -> Result<Option<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT learner_id, question_id, subject, encoding_strength,
                   current_interval_days, next_review_at, level, consecutive_correct
            FROM review_states
            WHERE learner_id = ?1 AND question_id = ?2
        "#,
    )
    .bind(learner_id)
    .bind(question_id)
    .fetch_optional(executor)
    .await
}

/// Insert the row, or overwrite every scheduling column of the existing row
/// for the same (learner, question).
pub async fn upsert_review<'e, E>(
    executor: E,
    row: &ReviewRow,
    updated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO review_states (
                learner_id, question_id, subject, encoding_strength,
                current_interval_days, next_review_at, level, consecutive_correct, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (learner_id, question_id)
            DO UPDATE SET
                subject = excluded.subject,
                encoding_strength = excluded.encoding_strength,
                current_interval_days = excluded.current_interval_days,
                next_review_at = excluded.next_review_at,
                level = excluded.level,
                consecutive_correct = excluded.consecutive_correct,
                updated_at = excluded.updated_at
        "#,
    )
    .bind(row.learner_id)
    .bind(row.question_id)
    .bind(&row.subject)
    .bind(row.encoding_strength)
    .bind(row.current_interval_days)
    .bind(row.next_review_at)
    .bind(&row.level)
    .bind(row.consecutive_correct)
    .bind(updated_at.timestamp_millis())
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete the row. Returns whether a row existed.
pub async fn delete_review<'e, E>(
    executor: E,
    learner_id: Uuid,
    question_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            DELETE FROM review_states
            WHERE learner_id = ?1 AND question_id = ?2
        "#,
    )
    .bind(learner_id)
    .bind(question_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Every row of a learner, optionally narrowed to one subject, earliest review first.
pub async fn list_reviews<'e, E>(
    executor: E,
    learner_id: Uuid,
    subject: Option<Subject>,
) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT learner_id, question_id, subject, encoding_strength,
                   current_interval_days, next_review_at, level, consecutive_correct
            FROM review_states
            WHERE learner_id = ?1 AND (?2 IS NULL OR subject = ?2)
            ORDER BY next_review_at ASC, question_id ASC
        "#,
    )
    .bind(learner_id)
    .bind(subject.map(Subject::as_str))
    .fetch_all(executor)
    .await
}

/// Rows of a learner due at `now`, earliest review first.
pub async fn list_due_reviews<'e, E>(
    executor: E,
    learner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT learner_id, question_id, subject, encoding_strength,
                   current_interval_days, next_review_at, level, consecutive_correct
            FROM review_states
            WHERE learner_id = ?1 AND next_review_at <= ?2
            ORDER BY next_review_at ASC, question_id ASC
        "#,
    )
    .bind(learner_id)
    .bind(now.timestamp_millis())
    .fetch_all(executor)
    .await
}
