use axum::{Router, routing::get};
use axum_helpers::{ShutdownCoordinator, create_production_app, serve};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::{MigrationOutcome, Store, common::RetryConfig};
use domain_events::RetentionSweeper;
use messaging::{OutboundQueue, nats::NatsPublisher};
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use update_router_api::{AppState, Config, app};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.log);
    observability::init_metrics()?;

    // Startup fails hard on any database error
    let store = Store::open_with_retry(
        &config.database.driver,
        config.database.sqlite.clone(),
        RetryConfig::default(),
    )
    .await
    .map_err(|e| eyre::eyre!("Database connection failed: {}", e))?;

    match store.migrate::<Migrator>(config.database.reset).await? {
        MigrationOutcome::NoChange => info!("No migrations to apply"),
        MigrationOutcome::Applied(count) => info!(count, "Migrations applied"),
    }
    if let Some(path) = &config.database.seed_path {
        store.seed(path).await?;
    }

    let shutdown = ShutdownCoordinator::default();

    let mirror = match &config.mirror {
        Some(mirror) => {
            let publisher = Arc::new(NatsPublisher::connect(&mirror.nats_url).await?);
            let (queue, receiver) = OutboundQueue::new(mirror.buffer);
            receiver.spawn_drain(publisher, mirror.topic.clone());
            info!(topic = %mirror.topic, "Mirroring events to NATS");
            Some(queue)
        }
        None => None,
    };

    let state = AppState::new(store.clone(), mirror);
    let sweeper = RetentionSweeper::new(state.events.clone()).spawn();

    let metrics_router = Router::new().route("/metrics", get(observability::metrics_handler));
    let metrics_server = {
        let metrics_config = config.metrics.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            info!(routine = "metrics", addr = %metrics_config.address(), "Starting metrics listener");
            if let Err(e) = serve(metrics_router, &metrics_config, shutdown).await {
                error!(routine = "metrics", error = %e, "Metrics listener failed");
            }
        })
    };

    let router = app(&state, &config.api);
    info!(roots = ?config.api.roots(), "Starting module-update-router");

    create_production_app(
        router,
        &config.server,
        shutdown,
        Duration::from_secs(30),
        async move {
            sweeper.abort();
            info!("Shutting down: closing database");
            store.close().await;
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    let _ = metrics_server.await;
    info!("module-update-router shutdown complete");
    Ok(())
}
