use std::path::PathBuf;

use serde::Deserialize;

/// Runtime configuration, read once at startup and injected into the
/// components that need it. The secret key is the only required value.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub page_size: u32,
    pub output_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let api_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                config::ConfigError::Message(
                    "Please set your STRIPE_SECRET_KEY environment variable".to_string(),
                )
            })?;

        let page_size = match std::env::var("PAYOUT_PAGE_SIZE") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                config::ConfigError::Message(format!(
                    "PAYOUT_PAGE_SIZE must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            Err(_) => 300,
        };

        Ok(Self {
            api_key,
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            page_size,
            output_root: std::env::var("ARCHIVE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }
}
