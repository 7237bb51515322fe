// FinFancy API server
// Decision: Stores are built here and injected; no global client handles
// Decision: Without DATABASE_URL the server runs on in-memory stores (dev mode)

use anyhow::{Context, Result};
use finfancy_api::{build_app, spawn_session_sweeper, Settings};
use finfancy_core::{
    Authenticator, InMemorySessionStore, InMemoryUserStore, SessionStore, UserStore,
};
use finfancy_storage::{create_db_session_store, create_db_user_store, Database};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment variables take precedence
    dotenvy::dotenv().ok();

    // Configure via RUST_LOG (default: finfancy_api=debug, core/storage at info, tower_http=debug)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "finfancy_api=debug,finfancy_core=info,finfancy_storage=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("finfancy-api starting...");

    let settings = Settings::from_env();
    tracing::info!(
        env = %settings.auth.environment.as_str(),
        session_minutes = settings.auth.session_lifetime.as_secs() / 60,
        secure_cookies = settings.auth.secure_cookies(),
        "Authentication configured"
    );

    let (db, users, sessions): (Option<Database>, Arc<dyn UserStore>, Arc<dyn SessionStore>) =
        match settings.database_url.as_deref() {
            Some(url) => {
                let db = Database::from_url(url)
                    .await
                    .context("Failed to connect to database")?;
                db.migrate().await.context("Failed to run migrations")?;
                tracing::info!("Connected to database");

                let users: Arc<dyn UserStore> = Arc::new(create_db_user_store(db.clone()));
                let sessions: Arc<dyn SessionStore> =
                    Arc::new(create_db_session_store(db.clone()));
                (Some(db), users, sessions)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory stores (data is lost on exit)");
                let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
                let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
                (None, users, sessions)
            }
        };

    let authenticator = Arc::new(Authenticator::new(
        users.clone(),
        sessions,
        settings.auth.session_lifetime,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = match settings.session_sweep_interval {
        Some(interval) => {
            tracing::info!(interval_secs = interval.as_secs(), "Session sweeper enabled");
            Some(spawn_session_sweeper(
                authenticator.clone(),
                interval,
                shutdown_rx,
            ))
        }
        None => {
            tracing::info!("Session sweeper disabled");
            None
        }
    };

    if !settings.api_prefix.is_empty() {
        tracing::info!(prefix = %settings.api_prefix, "API prefix configured");
    }
    let app = build_app(&settings, authenticator, users);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", settings.bind_addr))?;
    tracing::info!("HTTP server listening on {}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            tracing::warn!("Session sweeper task failed: {}", e);
        }
    }
    if let Some(db) = db {
        db.close().await;
    }

    tracing::info!("finfancy-api stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
