//! Study session controller.
//!
//! A session walks through `Idle -> Active -> (Paused <-> Active) -> Completed`.
//! It owns one learner's [`ReviewStore`] for its whole lifetime, so all writes
//! for that learner go through it.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use qz_db::ReviewStore;
use qz_srs::{AdaptiveLevel, LevelChange, ReviewState, StudyPool, Subject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grading;
use crate::summary::SessionTally;
use crate::{
    Clock, ProviderError, Question, QuestionProvider, SessionSummary, StudyError, SystemClock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Active,
    Paused,
    Completed,
}

impl SessionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a question fetch is attempted before giving up.
///
/// Only [`ProviderError::Unavailable`] is retried; a missing question fails
/// on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// A question handed out for review, with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyItem {
    pub question: Question,
    pub state: ReviewState,
}

/// Result of one submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
    /// State as persisted after the answer
    pub state: ReviewState,
    pub previous_level: AdaptiveLevel,
    pub level_change: LevelChange,
    pub correct: bool,
    /// The stored state was corrupt and was reset before applying the answer
    pub recovered: bool,
}

/// Study session for one learner.
///
/// Operations run one at a time (`&mut self`); the store and the provider are
/// the only places a call can suspend.
pub struct StudySession<S, P, C = SystemClock> {
    id: Uuid,
    subject: Option<Subject>,
    status: SessionStatus,
    store: S,
    provider: P,
    clock: C,
    retry: RetryPolicy,
    pool: StudyPool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    last_activity_at: DateTime<Utc>,
    tally: SessionTally,
}

impl<S, P> StudySession<S, P, SystemClock>
where
    S: ReviewStore,
    P: QuestionProvider,
{
    pub fn new(store: S, provider: P) -> Self {
        Self::with_clock(store, provider, SystemClock)
    }
}

impl<S, P, C> StudySession<S, P, C>
where
    S: ReviewStore,
    P: QuestionProvider,
    C: Clock,
{
    pub fn with_clock(store: S, provider: P, clock: C) -> Self {
        let now = clock.now();
        Self {
            id: Uuid::new_v4(),
            subject: None,
            status: SessionStatus::Idle,
            store,
            provider,
            clock,
            retry: RetryPolicy::default(),
            pool: StudyPool::new(),
            started_at: None,
            ended_at: None,
            last_activity_at: now,
            tally: SessionTally::default(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Subject filter chosen at start, `None` for every subject.
    pub fn subject(&self) -> Option<Subject> {
        self.subject
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Start the session and load the review pool.
    ///
    /// # Errors
    ///
    /// * [`StudyError::SessionClosed`] if the session already ended
    /// * [`StudyError::InvalidTransition`] if it was already started
    /// * [`StudyError::Store`] if the pool cannot be loaded
    pub async fn start(&mut self, subject: Option<Subject>) -> Result<(), StudyError> {
        match self.status {
            SessionStatus::Idle => {}
            SessionStatus::Completed => return Err(StudyError::SessionClosed),
            from => {
                return Err(StudyError::InvalidTransition {
                    from,
                    action: "start",
                });
            }
        }

        let states = self.store.load(subject).await?;
        self.pool = states.into_iter().collect();

        let now = self.touch();
        self.subject = subject;
        self.started_at = Some(now);
        self.status = SessionStatus::Active;

        tracing::info!(
            session_id = %self.id,
            subject = subject.map(Subject::as_str),
            pool_size = self.pool.len(),
            due = self.pool.due_count(now),
            "Study session started"
        );
        Ok(())
    }

    /// Hand out the next due question.
    ///
    /// # Errors
    ///
    /// * [`StudyError::NoQuestionDue`] when nothing in the pool is due
    /// * [`StudyError::QuestionUnavailable`] when the provider keeps failing
    /// * [`StudyError::NotActive`] / [`StudyError::SessionClosed`] outside Active
    pub async fn next_question(&mut self) -> Result<StudyItem, StudyError> {
        self.ensure_active()?;
        let now = self.touch();

        let state = qz_srs::select_next(&self.pool, now)
            .cloned()
            .ok_or(StudyError::NoQuestionDue)?;
        let question = self.fetch_question(state.question_id).await?;

        Ok(StudyItem { question, state })
    }

    /// Record whether the learner answered `question_id` correctly.
    ///
    /// The question's state is taken from the pool, then from the store, and
    /// created fresh when it was never studied. A corrupt state is logged and
    /// reset before the answer is applied.
    pub async fn submit_response(
        &mut self,
        question_id: Uuid,
        correct: bool,
        latency_ms: u64,
    ) -> Result<ReviewOutcome, StudyError> {
        self.ensure_active()?;
        self.apply(question_id, None, correct, latency_ms).await
    }

    /// Grade a free-text or option answer, then record it.
    pub async fn submit_answer(
        &mut self,
        question_id: Uuid,
        response: &str,
        latency_ms: u64,
    ) -> Result<ReviewOutcome, StudyError> {
        self.ensure_active()?;
        let question = self.fetch_question(question_id).await?;
        let correct = grading::is_correct(&question, response);
        self.apply(question_id, Some(question.subject), correct, latency_ms)
            .await
    }

    pub fn pause(&mut self) -> Result<(), StudyError> {
        match self.status {
            SessionStatus::Active => {
                self.status = SessionStatus::Paused;
                self.touch();
                tracing::debug!(session_id = %self.id, "Study session paused");
                Ok(())
            }
            SessionStatus::Completed => Err(StudyError::SessionClosed),
            from => Err(StudyError::InvalidTransition {
                from,
                action: "pause",
            }),
        }
    }

    pub fn resume(&mut self) -> Result<(), StudyError> {
        match self.status {
            SessionStatus::Paused => {
                self.status = SessionStatus::Active;
                self.touch();
                tracing::debug!(session_id = %self.id, "Study session resumed");
                Ok(())
            }
            SessionStatus::Completed => Err(StudyError::SessionClosed),
            from => Err(StudyError::InvalidTransition {
                from,
                action: "resume",
            }),
        }
    }

    /// End the session. Safe to call in any state, and again after it ended.
    pub fn end(&mut self) -> SessionSummary {
        if self.status != SessionStatus::Completed {
            let now = self.touch();
            self.status = SessionStatus::Completed;
            self.ended_at = Some(now);

            let summary = self.summary();
            tracing::info!(
                session_id = %self.id,
                answered = summary.answered,
                correct = summary.correct,
                promotions = summary.promotions,
                demotions = summary.demotions,
                "Study session completed"
            );
            return summary;
        }
        self.summary()
    }

    /// Drop a question from the learner's schedule.
    ///
    /// Returns whether the question had a review state.
    pub async fn archive(&mut self, question_id: Uuid) -> Result<bool, StudyError> {
        if self.status == SessionStatus::Completed {
            return Err(StudyError::SessionClosed);
        }
        self.touch();

        let removed = self.store.remove(question_id).await?;
        let in_pool = self.pool.remove(&question_id).is_some();
        self.tally.forget(&question_id);

        if removed || in_pool {
            tracing::info!(session_id = %self.id, %question_id, "Question archived");
        }
        Ok(removed || in_pool)
    }

    /// Whether the question is part of the loaded pool.
    pub fn is_tracked(&self, question_id: &Uuid) -> bool {
        self.pool.contains(question_id)
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn due_count(&self) -> usize {
        self.pool.due_count(self.clock.now())
    }

    pub fn summary(&self) -> SessionSummary {
        self.tally.summarize(
            self.id,
            self.subject,
            self.status,
            self.started_at,
            self.ended_at,
        )
    }

    fn ensure_active(&self) -> Result<(), StudyError> {
        match self.status {
            SessionStatus::Active => Ok(()),
            SessionStatus::Completed => Err(StudyError::SessionClosed),
            other => Err(StudyError::NotActive(other)),
        }
    }

    fn touch(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        self.last_activity_at = now;
        now
    }

    async fn apply(
        &mut self,
        question_id: Uuid,
        subject: Option<Subject>,
        correct: bool,
        latency_ms: u64,
    ) -> Result<ReviewOutcome, StudyError> {
        let now = self.touch();
        let current = self.current_state(question_id, subject, now).await?;

        let (next, recovered) = match qz_srs::compute_next_state(&current, correct, latency_ms, now)
        {
            Ok(next) => (next, false),
            Err(err) => {
                tracing::warn!(
                    session_id = %self.id,
                    %question_id,
                    error = %err,
                    "Corrupt review state, resetting to a fresh one"
                );
                let fresh = ReviewState::new(question_id, current.subject, now);
                (
                    qz_srs::compute_next_state(&fresh, correct, latency_ms, now)?,
                    true,
                )
            }
        };

        self.store.upsert(&next).await?;
        if self.subject.is_none_or(|s| s == next.subject) {
            self.pool.upsert(next.clone());
        }

        let previous_level = if recovered {
            AdaptiveLevel::Beginner
        } else {
            current.level
        };
        let level_change = LevelChange::between(previous_level, next.level);
        self.tally.record(correct, level_change, &next);

        Ok(ReviewOutcome {
            state: next,
            previous_level,
            level_change,
            correct,
            recovered,
        })
    }

    async fn current_state(
        &self,
        question_id: Uuid,
        subject: Option<Subject>,
        now: DateTime<Utc>,
    ) -> Result<ReviewState, StudyError> {
        if let Some(state) = self.pool.get(&question_id) {
            return Ok(state.clone());
        }
        if let Some(state) = self.store.get(question_id).await? {
            return Ok(state);
        }

        let subject = match subject {
            Some(subject) => subject,
            None => self.fetch_question(question_id).await?.subject,
        };
        tracing::debug!(session_id = %self.id, %question_id, "First review of question");
        Ok(ReviewState::new(question_id, subject, now))
    }

    async fn fetch_question(&self, question_id: Uuid) -> Result<Question, StudyError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.provider.fetch_question(question_id).await {
                Ok(question) => return Ok(question),
                Err(ProviderError::Unavailable(reason)) if attempt < self.retry.attempts => {
                    tracing::warn!(
                        %question_id,
                        attempt,
                        %reason,
                        "Question provider unavailable, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(err) => {
                    tracing::error!(%question_id, attempt, error = %err, "Failed to fetch question");
                    return Err(StudyError::QuestionUnavailable {
                        question_id,
                        attempts: attempt,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
}
