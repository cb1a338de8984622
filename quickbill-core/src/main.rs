use dotenv::dotenv;
use quickbill_core::api::{create_router, AppState, SharedLedger};
use quickbill_core::clock::{Clock, SystemClock};
use quickbill_core::config::Config;
use quickbill_core::ledger::Ledger;
use quickbill_core::store::{FileStore, KeyValueStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting QuickBill Core Server...");

    let config = Config::from_env()?;
    info!(
        "Using data directory {} ({} client aggregation)",
        config.data_dir.display(),
        config.aggregation
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ledger: SharedLedger = Ledger::with_clock(store, clock).with_aggregation(config.aggregation);

    let app = create_router(AppState::new(ledger));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", address, e))?;

    info!("Server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("QuickBill Core Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
