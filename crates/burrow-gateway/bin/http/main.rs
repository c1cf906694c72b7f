mod cli;

use crate::cli::{Cli, StorageBackendArg};
use anyhow::Context;
use burrow_gateway::{App, AppState, QrOptions};
use burrow_generator::RandomGenerator;
use burrow_shortener::{AllocatorSettings, Shortener, ShortenerService};
use burrow_storage::{InMemoryRepository, Repository, SqliteRepository};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    let _telemetry = burrow_telemetry::init(&config.telemetry())?;

    info!(
        listen_addr = %config.listen_addr(),
        storage_backend = %config.storage,
        log_format = %config.log_format,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => run_server(&config, InMemoryRepository::new()).await,
        StorageBackendArg::Sqlite => {
            let repository =
                SqliteRepository::connect(&config.database_url, config.max_connections)
                    .await
                    .with_context(|| format!("failed to open {}", config.database_url))?;
            run_server(&config, repository).await
        }
    }
}

async fn run_server<R: Repository>(config: &Cli, repository: R) -> anyhow::Result<()> {
    let settings = AllocatorSettings::builder()
        .max_attempts(config.max_attempts)
        .build();
    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::with_settings(
        repository,
        RandomGenerator::new(),
        settings,
    ));

    let mut state = AppState::new(shortener).with_qr_options(QrOptions {
        size: config.qr_size,
    });
    if let Some(base_url) = &config.public_base_url {
        state = state.with_public_base_url(base_url.clone());
    }

    let listen_addr: SocketAddr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    App::serve(listener, state, shutdown_signal())
        .await
        .context("gateway server failed")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
