//! Study mode for QuizAI.
//!
//! [`StudySession`] drives the scheduler from `qz-srs` over a learner's
//! [`qz_db::ReviewStore`]: it loads the pool, hands out the next due question,
//! records answers and reports a summary when the session ends.

pub mod clock;
pub mod error;
pub mod grading;
pub mod question;
pub mod session;
pub mod summary;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ProviderError, StudyError};
pub use question::{Difficulty, Question, QuestionBank, QuestionOption, QuestionProvider};
pub use session::{RetryPolicy, ReviewOutcome, SessionStatus, StudyItem, StudySession};
pub use summary::SessionSummary;

pub use qz_srs::{AdaptiveLevel, LevelChange, ReviewState, Subject};
