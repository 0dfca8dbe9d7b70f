use std::time::Duration;

use qz_study::RetryPolicy;
use serde::Deserialize;

/// Deployment environment, read from `ENVIRONMENT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server configuration, loaded from environment variables.
///
/// Every field maps to the upper-cased variable of the same name
/// (`database_url` is `DATABASE_URL`) and has a default.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default, rename = "environment")]
    pub env: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
    /// Attempts per question fetch before a session reports it unavailable
    #[serde(default = "default_question_fetch_attempts")]
    pub question_fetch_attempts: u32,
    #[serde(default = "default_question_retry_delay_ms")]
    pub question_retry_delay_ms: u64,
    /// Sessions without activity for this long are ended by the reaper job
    #[serde(default = "default_session_idle_timeout_secs")]
    pub session_idle_timeout_secs: u64,
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

fn default_database_url() -> String {
    "sqlite://quizai.db?mode=rwc".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_db_connections() -> u32 {
    5
}

const fn default_question_fetch_attempts() -> u32 {
    3
}

const fn default_question_retry_delay_ms() -> u64 {
    1000
}

const fn default_session_idle_timeout_secs() -> u64 {
    1800
}

const fn default_enable_metrics() -> bool {
    true
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.question_fetch_attempts,
            Duration::from_millis(self.question_retry_delay_ms),
        )
    }

    pub fn session_idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.session_idle_timeout_secs).unwrap_or(i64::MAX))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            env: Environment::default(),
            port: default_port(),
            max_db_connections: default_max_db_connections(),
            question_fetch_attempts: default_question_fetch_attempts(),
            question_retry_delay_ms: default_question_retry_delay_ms(),
            session_idle_timeout_secs: default_session_idle_timeout_secs(),
            enable_metrics: default_enable_metrics(),
        }
    }
}
