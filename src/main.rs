use anyhow::Context;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};

use ticketflow_api::{
    app_router,
    config::{init_tracing, load_config},
    db,
    events::{process_events, EventSender},
    handlers::AppServices,
    AppState,
};

const EVENT_CHANNEL_CAPACITY: usize = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(config.log_level(), config.log_json);

    info!(
        environment = %config.environment,
        "Starting TicketFlow API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_pool = Arc::new(
        db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to the database")?,
    );

    if config.auto_migrate {
        info!("Running database migrations");
        db::run_migrations(&db_pool)
            .await
            .context("failed to run database migrations")?;
    }

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let event_sender = EventSender::new(event_tx);
    tokio::spawn(async move {
        process_events(event_rx).await;
    });

    let default_tax_rate = Decimal::try_from(config.default_tax_rate_percent)
        .context("default_tax_rate_percent is not a valid decimal")?;
    let services = AppServices::new(
        db_pool.clone(),
        Arc::new(event_sender.clone()),
        default_tax_rate,
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        db: db_pool,
        config,
        event_sender,
        services,
    };
    let app = app_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    info!("Shutdown signal received, draining connections");
}
