use metrics_exporter_prometheus::PrometheusHandle;
use qz_study::QuestionBank;
use sqlx::SqlitePool;

use crate::{ApiConfig, study::SessionRegistry};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub bank: QuestionBank,
    pub sessions: SessionRegistry,
    pub config: ApiConfig,
    /// `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl ApiState {
    pub fn new(config: ApiConfig, pool: SqlitePool, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            pool,
            bank: QuestionBank::new(),
            sessions: SessionRegistry::new(),
            config,
            metrics,
        }
    }
}
