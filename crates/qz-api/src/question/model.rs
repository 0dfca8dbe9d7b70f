use chrono::Utc;
use qz_study::{Difficulty, Question, QuestionOption, Subject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{error::ApiError, validation};

/// Option of a multiple-choice question in a create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptionInput {
    #[validate(length(min = 1, max = 16))]
    pub id: String,
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Body of `POST /v1/questions`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[serde(default)]
    #[validate(length(max = 10), nested)]
    pub options: Vec<OptionInput>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    pub subject: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
}

impl CreateQuestionRequest {
    /// Validate the request and build the question it describes.
    pub fn into_question(self) -> Result<Question, ApiError> {
        validation::validate_request(&self)?;
        let subject = validation::parse_subject(&self.subject)?;
        validation::validate_options(&self.options)?;

        Ok(Question {
            id: Uuid::new_v4(),
            text: self.text.trim().to_string(),
            options: self
                .options
                .into_iter()
                .map(|o| QuestionOption {
                    id: o.id,
                    text: o.text,
                    is_correct: o.is_correct,
                })
                .collect(),
            correct_answer: self.correct_answer,
            subject,
            difficulty: self.difficulty.unwrap_or(Difficulty::Medio),
            tags: self.tags,
            created_at: Utc::now(),
        })
    }
}

/// Query of `GET /v1/questions`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuestionsQuery {
    pub subject: Option<String>,
}

/// Option shown to a learner, without the answer key
#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: String,
    pub text: String,
}

/// Question shown to a learner during a session, without the answer key
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<OptionView>,
    pub subject: Subject,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

impl From<Question> for QuestionView {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            text: question.text,
            options: question
                .options
                .into_iter()
                .map(|o| OptionView {
                    id: o.id,
                    text: o.text,
                })
                .collect(),
            subject: question.subject,
            difficulty: question.difficulty,
            tags: question.tags,
        }
    }
}
