use anyhow::Context;
use qz_api::{ApiConfig, ApiState, jobs, metrics, router};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("invalid configuration")?;

    qz_api::tracing::init_tracing(config.env);

    let metrics_handle = if config.enable_metrics {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let pool = qz_db::create_pool(&config.database_url, config.max_db_connections).await?;
    qz_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let port = config.port;
    let idle_timeout = config.session_idle_timeout();
    let state = ApiState::new(config, pool, metrics_handle);

    let background_jobs = jobs::start_background_jobs(state.sessions.clone(), idle_timeout);

    let app = router::router()
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Server running on http://localhost:{port}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for job in background_jobs {
        job.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
