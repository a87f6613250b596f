use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::models::{BalanceTransaction, Charge, Invoice, Page, Payout};
use crate::config::Config;
use crate::error::{LedgerError, LedgerResult};

/// Read-only view of the remote payment ledger. List calls fetch one
/// page per call; callers walk `Page::next_cursor` until exhaustion.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn payouts_page(&self, cursor: Option<&str>) -> LedgerResult<Page<Payout>>;

    async fn transactions_page(
        &self,
        payout_id: &str,
        cursor: Option<&str>,
    ) -> LedgerResult<Page<BalanceTransaction>>;

    async fn charge(&self, id: &str) -> LedgerResult<Charge>;

    async fn invoice(&self, id: &str) -> LedgerResult<Invoice>;
}

/// Stripe-backed ledger client
pub struct StripeLedgerClient {
    http: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl StripeLedgerClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        }
    }

    fn list_query(&self, cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("starting_after", cursor.to_string()));
        }
        query
    }

    async fn get_json<T>(&self, url: String, query: &[(&'static str, String)]) -> LedgerResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus { status, url });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LedgerClient for StripeLedgerClient {
    async fn payouts_page(&self, cursor: Option<&str>) -> LedgerResult<Page<Payout>> {
        let query = self.list_query(cursor);
        self.get_json(format!("{}/v1/payouts", self.base_url), &query)
            .await
    }

    async fn transactions_page(
        &self,
        payout_id: &str,
        cursor: Option<&str>,
    ) -> LedgerResult<Page<BalanceTransaction>> {
        let mut query = self.list_query(cursor);
        query.push(("payout", payout_id.to_string()));
        self.get_json(format!("{}/v1/balance_transactions", self.base_url), &query)
            .await
    }

    async fn charge(&self, id: &str) -> LedgerResult<Charge> {
        self.get_json(format!("{}/v1/charges/{}", self.base_url, id), &[])
            .await
    }

    async fn invoice(&self, id: &str) -> LedgerResult<Invoice> {
        self.get_json(format!("{}/v1/invoices/{}", self.base_url, id), &[])
            .await
    }
}
