use serde::{Deserialize, Serialize};
use std::fmt;

/// A disbursement of funds to the merchant's bank account, composed of
/// balance transactions. `arrival_date` is epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub arrival_date: i64,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
}

/// Balance transaction type discriminator. Anything other than a
/// charge or a payment is ignored by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Charge,
    Payment,
    #[serde(other)]
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Charge => "charge",
            TransactionKind::Payment => "payment",
            TransactionKind::Other => "other",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry attributing a charge or payment to a payout.
/// `source` is the id of the underlying charge/payment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub source: Option<String>,
}

/// A charge or payment record. Both balance-transaction kinds resolve
/// through the same endpoint; `invoice` is absent when the funds were
/// not collected against an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    pub invoice: Option<String>,
}

/// A billing document with a link to its rendered PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_pdf: Option<String>,
}

/// One resolved download: an invoice id paired with its PDF link
#[derive(Debug, Clone)]
pub struct InvoiceDownload {
    pub invoice_id: String,
    pub pdf_url: String,
}

/// Anything the provider lists with a cursorable id
pub trait LedgerObject {
    fn object_id(&self) -> &str;
}

impl LedgerObject for Payout {
    fn object_id(&self) -> &str {
        &self.id
    }
}

impl LedgerObject for BalanceTransaction {
    fn object_id(&self) -> &str {
        &self.id
    }
}

/// One page of a provider list response. The provider never reports a
/// total count; the walk ends when `has_more` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub has_more: bool,
}

impl<T: LedgerObject> Page<T> {
    /// Cursor for the next page: the last object id, when more remain
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.data.last().map(|object| object.object_id())
        } else {
            None
        }
    }
}
