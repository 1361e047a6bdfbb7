//! matchday server entry point.
//!
//! Loads configuration, opens the store, and serves REST and WebSocket
//! endpoints.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use matchday::api;
use matchday::app_state::{AppState, RefreshIntervals};
use matchday::config::{LogFormat, SiteConfig, StoreBackend};
use matchday::domain::{EventBus, RetentionPolicy};
use matchday::persistence::{MatchStore, MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SiteConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(addr = %config.listen_addr, backend = ?config.store_backend, "starting matchday");

    let store = open_store(&config).await?;
    let event_bus = EventBus::new(config.event_bus_capacity);
    let policy = RetentionPolicy {
        max_age: Duration::from_secs(config.chat_max_age_secs),
        max_messages: config.chat_history_limit,
    };

    let mut app_state = AppState::new(store, event_bus, policy).with_refresh(RefreshIntervals {
        chat_ms: config.chat_refresh_ms,
        poll_ms: config.poll_refresh_ms,
    });
    match config.admin_token.as_deref() {
        Some(token) => app_state = app_state.with_admin_token(token),
        None => tracing::warn!("ADMIN_TOKEN not set; admin routes are open"),
    }

    let app = api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_store(config: &SiteConfig) -> Result<Arc<dyn MatchStore>, Box<dyn std::error::Error>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(
                &config.database_url,
                config.database_max_connections,
                config.database_min_connections,
                config.database_connect_timeout(),
            )
            .await?;
            if config.database_run_migrations {
                store.migrate().await?;
                tracing::info!("database migrations applied");
            }
            Ok(Arc::new(store))
        }
    }
}
