//! Background jobs for periodic maintenance tasks.

use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;

use crate::{metrics, study::SessionRegistry};

/// How often the idle-session reaper runs
const REAPER_PERIOD: Duration = Duration::from_secs(60);

/// Start all background jobs
///
/// Returns the join handles so the caller can abort them on shutdown
pub fn start_background_jobs(
    sessions: SessionRegistry,
    idle_timeout: chrono::Duration,
) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(session_reaper_job(sessions, idle_timeout))]
}

/// End sessions left idle and forget completed ones, once a minute
async fn session_reaper_job(sessions: SessionRegistry, idle_timeout: chrono::Duration) {
    let mut interval = interval(REAPER_PERIOD);

    loop {
        interval.tick().await;

        let report = sessions.reap(Utc::now(), idle_timeout).await;
        metrics::record_session_events("reaped", report.ended as u64);

        if report.ended > 0 || report.dropped > 0 {
            let remaining = sessions.len().await;
            tracing::info!(
                ended = report.ended,
                dropped = report.dropped,
                remaining = remaining,
                "Session reaper pass complete"
            );
        } else {
            tracing::debug!("Session reaper pass complete: nothing to do");
        }
    }
}
