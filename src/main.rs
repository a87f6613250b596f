mod archive;
mod bootstrap;
mod config;
mod download;
mod error;
mod ledger;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::archive::RunReport;
use crate::config::Config;
use crate::error::{AppError, AppResult};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,payout_archiver=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> AppResult<RunReport> {
    let config = Config::from_env()?;
    let archiver = bootstrap::build_archiver(&config)?;
    Ok(archiver.run().await)
}

#[tokio::main]
async fn main() {
    init_tracing();

    info!("🚀 Starting payout invoice archiver");

    dotenv::dotenv().ok();

    // Per-item failures are already on the run report; only a startup
    // failure exits non-zero.
    match run().await {
        Ok(report) => {
            if !report.failures.is_empty() {
                info!("Completed with {} recorded failures", report.failures.len());
            }
        }
        Err(AppError::Config(err)) => {
            error!("❌ {}", err);
            std::process::exit(1);
        }
        Err(err) => {
            error!("❌ Startup failed: {}", err);
            std::process::exit(1);
        }
    }
}
