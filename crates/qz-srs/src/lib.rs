//! SRS (Spaced Repetition System) library for QuizAI
//!
//! This crate provides the adaptive scheduling model used by study mode: the
//! level table, the per-question review state, the due-ordered study pool and
//! the pure scheduler functions that move a state forward after each answer.
//!
//! Nothing in here performs I/O. Persistence lives in `qz-db` and the session
//! state machine lives in `qz-study`.

pub mod engine;
pub mod error;
pub mod level;
pub mod pool;
pub mod state;
pub mod subject;

pub use engine::{MAX_INTERVAL_DAYS, compute_next_state, select_next};
pub use error::InvalidStateError;
pub use level::{AdaptiveLevel, LevelChange};
pub use pool::StudyPool;
pub use state::ReviewState;
pub use subject::{Subject, UnknownSubject};
