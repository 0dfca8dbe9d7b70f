//! In-memory registry of live study sessions.
//!
//! A learner may have at most one session that is not completed, which keeps
//! a single writer on that learner's review states.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use qz_db::SqliteReviewStore;
use qz_study::{QuestionBank, SessionStatus, StudySession};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::ApiError;

pub type LearnerSession = StudySession<SqliteReviewStore, QuestionBank>;

/// Shared handle to one registered session.
#[derive(Clone)]
pub struct SessionHandle {
    pub learner_id: Uuid,
    pub session: Arc<Mutex<LearnerSession>>,
}

/// Counts of one reaper pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReapReport {
    /// Idle sessions that were ended
    pub ended: usize,
    /// Completed sessions dropped from the registry
    pub dropped: usize,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a started session.
    ///
    /// Fails with [`ApiError::Conflict`] if the learner already has an open
    /// session. A session that is busy serving a request counts as open.
    pub async fn register(
        &self,
        learner_id: Uuid,
        session: LearnerSession,
    ) -> Result<SessionHandle, ApiError> {
        let mut sessions = self.sessions.write().await;

        let open = sessions.values().find(|handle| {
            handle.learner_id == learner_id
                && handle
                    .session
                    .try_lock()
                    .map_or(true, |s| s.status() != SessionStatus::Completed)
        });
        if let Some(existing) = open {
            let existing_id = existing
                .session
                .try_lock()
                .map_or_else(|_| "busy".to_string(), |s| s.id().to_string());
            return Err(ApiError::Conflict(format!(
                "learner {learner_id} already has an open study session ({existing_id})"
            )));
        }

        let session_id = session.id();
        let handle = SessionHandle {
            learner_id,
            session: Arc::new(Mutex::new(session)),
        };
        sessions.insert(session_id, handle.clone());
        Ok(handle)
    }

    pub async fn get(&self, session_id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    /// Like [`Self::get`], but a missing session is an [`ApiError::NotFound`].
    pub async fn find(&self, session_id: Uuid) -> Result<SessionHandle, ApiError> {
        self.get(session_id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Study session {session_id}")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// End sessions idle for longer than `idle_timeout` and drop completed
    /// sessions whose last activity is older than `idle_timeout`.
    ///
    /// Sessions busy with a request are skipped until the next pass.
    pub async fn reap(&self, now: DateTime<Utc>, idle_timeout: Duration) -> ReapReport {
        let mut report = ReapReport::default();
        let cutoff = now - idle_timeout;

        self.sessions.write().await.retain(|session_id, handle| {
            let Ok(mut session) = handle.session.try_lock() else {
                return true;
            };
            if session.last_activity_at() > cutoff {
                return true;
            }

            if session.status() == SessionStatus::Completed {
                report.dropped += 1;
                tracing::debug!(%session_id, "Dropped completed study session");
                return false;
            }

            let summary = session.end();
            report.ended += 1;
            tracing::info!(
                %session_id,
                learner_id = %handle.learner_id,
                answered = summary.answered,
                "Ended idle study session"
            );
            true
        });

        report
    }
}
