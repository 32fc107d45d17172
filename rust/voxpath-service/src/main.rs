use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};
use voxpath_service::{build_router, AppState, Config, WorkerPool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cfg = Config::from_env()?;
    let addr = cfg.addr()?;
    let pool = WorkerPool::new(cfg.workers, cfg.dispatcher_config())?;
    let app = build_router(AppState { pool: Arc::new(pool) });

    tracing::info!(
        core_version = %voxpath_core::version(),
        %addr,
        workers = cfg.workers,
        cache_size = cfg.cache_size,
        "starting voxpath-service"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
