use std::fmt;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Pipeline step a non-fatal failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ListPayouts,
    ListTransactions,
    ResolveInvoice,
    PrepareFolder,
    FetchInvoice,
    Download,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ListPayouts => "listing payouts",
            Stage::ListTransactions => "listing balance transactions",
            Stage::ResolveInvoice => "resolving invoice",
            Stage::PrepareFolder => "preparing folder",
            Stage::FetchInvoice => "fetching invoice",
            Stage::Download => "downloading pdf",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded failure. Every entry was already surfaced to the
/// operator via the log at the moment it happened.
#[derive(Debug, Clone)]
pub struct StepFailure {
    pub stage: Stage,
    pub subject: String,
    pub detail: String,
}

/// Outcome of one archiving run
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub payouts: u64,
    pub invoices_downloaded: u64,
    pub failures: Vec<StepFailure>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            payouts: 0,
            invoices_downloaded: 0,
            failures: Vec::new(),
        }
    }

    /// Record a non-fatal failure and warn the operator
    pub fn record(&mut self, stage: Stage, subject: impl Into<String>, detail: impl fmt::Display) {
        let subject = subject.into();
        let detail = detail.to_string();
        warn!("❌ Error {} ({}): {}", stage, subject, detail);
        self.failures.push(StepFailure {
            stage,
            subject,
            detail,
        });
    }

    pub fn failures_at(&self, stage: Stage) -> usize {
        self.failures
            .iter()
            .filter(|failure| failure.stage == stage)
            .count()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
