use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::archive::PayoutArchiver;
use crate::config::Config;
use crate::download::FileDownloader;
use crate::error::AppResult;
use crate::ledger::StripeLedgerClient;

/// Wire the ledger client and downloader into an archiver. One HTTP
/// client is shared by both.
pub fn build_archiver(config: &Config) -> AppResult<PayoutArchiver> {
    info!("Initializing application components...");

    let http = Client::builder()
        .user_agent(concat!("payout-archiver/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let ledger = Arc::new(StripeLedgerClient::new(http.clone(), config));
    info!("✅ Ledger client initialized for {}", config.api_base);

    let downloader = Arc::new(FileDownloader::new(http));
    info!("✅ Downloader initialized");

    Ok(PayoutArchiver::new(
        ledger,
        downloader,
        config.output_root.clone(),
    ))
}
