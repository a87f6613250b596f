// Payout archiving pipeline
//
// Strictly sequential per payout:
// list transactions -> classify -> resolve invoices (charges, then
// payments) -> merge -> prepare folder -> download all. Every remote
// failure is recorded on the run report and processing continues with
// the next sibling item.

pub mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::download::Downloader;
use crate::ledger::models::{BalanceTransaction, InvoiceDownload, Payout, TransactionKind};
use crate::ledger::LedgerClient;

pub use report::{RunReport, Stage, StepFailure};

/// Arrival day of a payout, formatted `YYYY-MM-DD` (UTC)
pub fn arrival_day(payout: &Payout) -> String {
    DateTime::from_timestamp(payout.arrival_date, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}

/// Folder a payout's invoices are archived into
pub fn folder_name(payout: &Payout) -> String {
    format!("{}-{}", arrival_day(payout), payout.id)
}

/// Split balance transactions into charge and payment source ids,
/// preserving listing order and per-occurrence multiplicity. Other
/// kinds and sourceless entries are ignored.
pub fn partition_sources(transactions: &[BalanceTransaction]) -> (Vec<String>, Vec<String>) {
    let mut charge_ids = Vec::new();
    let mut payment_ids = Vec::new();

    for txn in transactions {
        let Some(source) = &txn.source else {
            debug!("transaction {} has no source, skipping", txn.id);
            continue;
        };
        match txn.kind {
            TransactionKind::Charge => charge_ids.push(source.clone()),
            TransactionKind::Payment => payment_ids.push(source.clone()),
            TransactionKind::Other => {}
        }
    }

    (charge_ids, payment_ids)
}

/// Walks every payout of the account and downloads the PDFs of the
/// invoices that compose it into a dated per-payout folder.
pub struct PayoutArchiver {
    ledger: Arc<dyn LedgerClient>,
    downloader: Arc<dyn Downloader>,
    output_root: PathBuf,
}

impl PayoutArchiver {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        downloader: Arc<dyn Downloader>,
        output_root: PathBuf,
    ) -> Self {
        Self {
            ledger,
            downloader,
            output_root,
        }
    }

    /// Visit every payout exactly once, in listing order. Only a failed
    /// payout-page fetch ends the walk early; the run still completes
    /// normally and every failure is on the returned report.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new();

        info!("🗂️  Retrieving all payouts...");

        let mut cursor: Option<String> = None;
        loop {
            let page = match self.ledger.payouts_page(cursor.as_deref()).await {
                Ok(page) => page,
                Err(err) => {
                    report.record(Stage::ListPayouts, "payouts", err);
                    break;
                }
            };

            let next = page.next_cursor().map(str::to_string);

            for payout in &page.data {
                self.archive_payout(payout, &mut report).await;
                report.payouts += 1;
            }

            match next {
                Some(id) => cursor = Some(id),
                None => break,
            }
        }

        info!(
            "✅ Run {} finished in {}s: {} payouts, {} invoices downloaded, {} failures",
            report.run_id,
            Utc::now()
                .signed_duration_since(report.started_at)
                .num_seconds(),
            report.payouts,
            report.invoices_downloaded,
            report.failures.len()
        );

        report
    }

    async fn archive_payout(&self, payout: &Payout, report: &mut RunReport) {
        info!(
            "💸 Payout {} arrived {} ({} {})",
            payout.id,
            arrival_day(payout),
            payout.amount,
            payout.currency
        );

        let transactions = self.list_transactions(&payout.id, report).await;
        let (charge_ids, payment_ids) = partition_sources(&transactions);

        info!(
            "Resolving invoices for {} charges and {} payments",
            charge_ids.len(),
            payment_ids.len()
        );

        // Merge keeps charge-derived ids ahead of payment-derived ids
        // and performs no deduplication.
        let mut invoice_ids = self.resolve_invoices(&charge_ids, report).await;
        invoice_ids.extend(self.resolve_invoices(&payment_ids, report).await);

        let folder = self.prepare_folder(payout, report).await;
        self.download_all(&invoice_ids, &folder, report).await;

        info!("✅ Done with payout {}", payout.id);
    }

    /// Drain the balance-transaction listing for one payout. A failed
    /// page fetch stops the listing; whatever was collected before the
    /// failure still flows through the rest of the pipeline.
    async fn list_transactions(
        &self,
        payout_id: &str,
        report: &mut RunReport,
    ) -> Vec<BalanceTransaction> {
        let mut transactions = Vec::new();

        let mut cursor: Option<String> = None;
        loop {
            let page = match self
                .ledger
                .transactions_page(payout_id, cursor.as_deref())
                .await
            {
                Ok(page) => page,
                Err(err) => {
                    report.record(Stage::ListTransactions, payout_id, err);
                    break;
                }
            };

            let next = page.next_cursor().map(str::to_string);
            transactions.extend(page.data);

            match next {
                Some(id) => cursor = Some(id),
                None => break,
            }
        }

        transactions
    }

    /// Look up each charge/payment and collect its invoice id. Records
    /// without an invoice are skipped before any remote call.
    async fn resolve_invoices(&self, source_ids: &[String], report: &mut RunReport) -> Vec<String> {
        let mut invoice_ids = Vec::new();

        for source_id in source_ids {
            let charge = match self.ledger.charge(source_id).await {
                Ok(charge) => charge,
                Err(err) => {
                    report.record(Stage::ResolveInvoice, source_id.clone(), err);
                    continue;
                }
            };

            match charge.invoice {
                Some(invoice_id) if !invoice_id.is_empty() => invoice_ids.push(invoice_id),
                _ => debug!("charge {} has no invoice, skipping", source_id),
            }
        }

        invoice_ids
    }

    /// Derive and create the payout folder. Creation failure (e.g. the
    /// folder already exists) is recorded; downloads still go into the
    /// same path.
    async fn prepare_folder(&self, payout: &Payout, report: &mut RunReport) -> PathBuf {
        let folder = self.output_root.join(folder_name(payout));

        info!("📁 Creating folder {}", folder.display());
        if let Err(err) = tokio::fs::create_dir(&folder).await {
            report.record(Stage::PrepareFolder, folder.display().to_string(), err);
        }

        folder
    }

    /// Fetch each invoice's PDF link and download it as
    /// `<folder>/<invoiceID>.pdf`. Each failure skips one id only.
    async fn download_all(&self, invoice_ids: &[String], folder: &Path, report: &mut RunReport) {
        info!("⬇️  Downloading {} invoice PDFs...", invoice_ids.len());

        for invoice_id in invoice_ids {
            let invoice = match self.ledger.invoice(invoice_id).await {
                Ok(invoice) => invoice,
                Err(err) => {
                    report.record(Stage::FetchInvoice, invoice_id.clone(), err);
                    continue;
                }
            };

            let Some(pdf_url) = invoice.invoice_pdf else {
                debug!("invoice {} has no PDF link, skipping", invoice_id);
                continue;
            };

            let task = InvoiceDownload {
                invoice_id: invoice_id.clone(),
                pdf_url,
            };
            let dest = folder.join(format!("{}.pdf", task.invoice_id));
            match self.downloader.download(&dest, &task.pdf_url).await {
                Ok(()) => report.invoices_downloaded += 1,
                Err(err) => report.record(Stage::Download, task.invoice_id, err),
            }
        }
    }
}
