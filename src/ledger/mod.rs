pub mod client;
pub mod models;

pub use client::{LedgerClient, StripeLedgerClient};
pub use models::{BalanceTransaction, Charge, Invoice, InvoiceDownload, Page, Payout, TransactionKind};
