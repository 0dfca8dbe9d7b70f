//! HTTP API for QuizAI study mode.
//!
//! Exposes the question catalog and study sessions over axum. Each learner's
//! review states live in SQLite; sessions are kept in memory by
//! [`study::SessionRegistry`] until they end or go idle.

pub mod config;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod question;
pub mod router;
pub mod state;
pub mod study;
pub mod tracing;
pub mod v1;
pub mod validation;

pub use config::ApiConfig;
pub use error::ApiError;
pub use state::ApiState;
