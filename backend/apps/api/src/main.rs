//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use api::build_app;
use api::config::ApiConfig;
use chrono::Utc;
use contact::{ContactState, MemoryInquiryRepository};
use guard::{CounterStore, GuardConfig, GuardState, MemoryCounterStore, PgCounterStore};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Lower bound between counter purges
const MIN_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,guard=info,contact=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let guard_config = config.guard_config();

    tracing::info!(
        origins = ?config.allowed_origins(),
        max_requests = guard_config.rate_limit.max_requests,
        window_secs = guard_config.rate_limit.window.as_secs(),
        "Guard configured"
    );

    match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            serve(&config, PgCounterStore::new(pool), guard_config).await
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory rate limit counters");
            serve(&config, MemoryCounterStore::new(), guard_config).await
        }
    }
}

async fn serve<S>(config: &ApiConfig, store: S, guard_config: GuardConfig) -> anyhow::Result<()>
where
    S: CounterStore + Send + Sync + 'static,
{
    let guard_state = GuardState::new(store, guard_config);
    spawn_counter_purge(
        guard_state.store.clone(),
        guard_state.config.rate_limit.window,
    );

    let contact_state = ContactState::new(MemoryInquiryRepository::new());

    let app = build_app(guard_state, contact_state, &config.allowed_origins());

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Periodically drop counters whose window has elapsed
///
/// Failures are logged and retried on the next tick.
fn spawn_counter_purge<S>(store: Arc<S>, window: Duration)
where
    S: CounterStore + Send + Sync + 'static,
{
    let window_ms = window.as_millis() as i64;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(window.max(MIN_PURGE_INTERVAL));
        loop {
            ticker.tick().await;
            match store
                .purge_expired(Utc::now().timestamp_millis(), window_ms)
                .await
            {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Purged expired rate limit counters"),
                Err(e) => tracing::warn!(error = %e, "Rate limit counter purge failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
