//! Question catalog.
//!
//! Questions are owned outside the scheduler; study sessions only reach them
//! through [`QuestionProvider`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use qz_srs::Subject;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Facile,
    Medio,
    Difficile,
    Expert,
}

/// One choice of a multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

/// Exam question as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    /// Empty for open questions
    pub options: Vec<QuestionOption>,
    pub correct_answer: String,
    pub subject: Subject,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Where study sessions look questions up.
pub trait QuestionProvider: Send + Sync {
    fn fetch_question(
        &self,
        question_id: Uuid,
    ) -> impl Future<Output = Result<Question, ProviderError>> + Send;
}

/// In-process catalog. Clones share the same questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Arc<RwLock<HashMap<Uuid, Question>>>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a question.
    pub async fn insert(&self, question: Question) {
        self.questions.write().await.insert(question.id, question);
    }

    pub async fn get(&self, question_id: Uuid) -> Option<Question> {
        self.questions.read().await.get(&question_id).cloned()
    }

    pub async fn remove(&self, question_id: Uuid) -> Option<Question> {
        self.questions.write().await.remove(&question_id)
    }

    /// Questions of `subject` (or all), oldest first.
    pub async fn list(&self, subject: Option<Subject>) -> Vec<Question> {
        let mut questions: Vec<_> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| subject.is_none_or(|s| q.subject == s))
            .cloned()
            .collect();
        questions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        questions
    }

    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.questions.read().await.is_empty()
    }
}

impl QuestionProvider for QuestionBank {
    async fn fetch_question(&self, question_id: Uuid) -> Result<Question, ProviderError> {
        self.get(question_id)
            .await
            .ok_or(ProviderError::NotFound(question_id))
    }
}
