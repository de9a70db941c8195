mod cli;

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use tinylink_gateway::{App, AppState};
use tinylink_generator::RandomGenerator;
use tinylink_shortener::{LinkService, Shortener};
use tinylink_storage::{InMemoryRepository, PgRepository};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::{Cli, StorageBackendArg};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env file is normal outside local development
    dotenvy::dotenv().ok();

    let config = Cli::parse();
    tinylink_telemetry::init(config.log_format)?;

    let frontend_origin = HeaderValue::from_str(&config.frontend_url)
        .with_context(|| format!("invalid frontend url '{}'", config.frontend_url))?;

    let shortener = build_shortener(&config).await?;
    let app = App::service(AppState::new(shortener), frontend_origin);

    let listener = TcpListener::bind((config.host, config.port)).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        storage_backend = %config.storage,
        frontend_url = %config.frontend_url,
        "starting tinylink gateway"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("tinylink gateway stopped");
    Ok(())
}

async fn build_shortener(config: &Cli) -> anyhow::Result<Arc<dyn Shortener>> {
    match config.storage {
        StorageBackendArg::InMemory => {
            warn!("using in-memory storage, links are lost on restart");
            Ok(Arc::new(LinkService::new(
                InMemoryRepository::new(),
                RandomGenerator::new(),
            )))
        }
        StorageBackendArg::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when the storage backend is postgres")?;
            let repository = PgRepository::connect(database_url, config.max_connections)
                .await
                .context("failed to connect to postgres")?;
            repository
                .migrate()
                .await
                .context("failed to apply links schema")?;

            Ok(Arc::new(LinkService::new(repository, RandomGenerator::new())))
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
