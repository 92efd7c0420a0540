//! The master ledger: one chronological timeline over the three streams.
//!
//! Each stream has a total projection into [`LedgerEntry`]; the unifier
//! concatenates the projected tails and stable-sorts them by date descending.
//! Equal timestamps keep input order (transactions, then dues, then supplier
//! purchases, each newest-first), which makes the merge deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dues::{Due, DueStatus},
    suppliers::{PaymentStatus, SupplierPurchase},
    transactions::{Transaction, TransactionKind},
};

/// How many records of each stream feed the ledger.
///
/// A display window, not a completeness guarantee: the merged view holds at
/// most the most recent `LEDGER_STREAM_CAP` entries per stream.
pub const LEDGER_STREAM_CAP: u64 = 100;

/// Which stream a ledger entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Sale,
    Expense,
    Due,
    Supplier,
}

impl LedgerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Expense => "expense",
            Self::Due => "due",
            Self::Supplier => "supplier",
        }
    }
}

/// Cash-flow direction of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerFlow {
    In,
    Out,
    Pending,
    Partial,
}

impl LedgerFlow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Pending => "pending",
            Self::Partial => "partial",
        }
    }
}

/// A normalized entry in the unified timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub title: String,
    pub amount_minor: i64,
    pub kind: LedgerKind,
    pub status: String,
    pub flow: LedgerFlow,
    /// Supplier entries only.
    pub remaining_due_minor: Option<i64>,
    /// Supplier entries only.
    pub paid_amount_minor: Option<i64>,
}

fn project_transaction(tx: &Transaction) -> LedgerEntry {
    let (kind, flow) = match tx.kind {
        TransactionKind::Sale => (LedgerKind::Sale, LedgerFlow::In),
        TransactionKind::Expense => (LedgerKind::Expense, LedgerFlow::Out),
    };
    LedgerEntry {
        id: tx.id,
        date: tx.occurred_at,
        title: tx
            .title
            .clone()
            .or_else(|| tx.category.clone())
            .unwrap_or_else(|| "General".to_string()),
        amount_minor: tx.amount_minor,
        kind,
        status: tx
            .payment_mode
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "Cash".to_string()),
        flow,
        remaining_due_minor: None,
        paid_amount_minor: None,
    }
}

fn project_due(due: &Due) -> LedgerEntry {
    let flow = match due.status {
        DueStatus::Paid => LedgerFlow::In,
        DueStatus::Pending => LedgerFlow::Pending,
    };
    LedgerEntry {
        id: due.id,
        date: due.effective_date(),
        title: format!("Udhar: {}", due.customer_name),
        amount_minor: due.amount_minor,
        kind: LedgerKind::Due,
        status: due.status.as_str().to_string(),
        flow,
        remaining_due_minor: None,
        paid_amount_minor: None,
    }
}

fn project_purchase(purchase: &SupplierPurchase) -> LedgerEntry {
    let flow = match purchase.payment_status {
        PaymentStatus::Paid => LedgerFlow::Out,
        PaymentStatus::Partial => LedgerFlow::Partial,
        PaymentStatus::Pending => LedgerFlow::Pending,
    };
    LedgerEntry {
        id: purchase.id,
        date: purchase.effective_date(),
        title: format!("Stock: {}", purchase.supplier_name),
        amount_minor: purchase.total_cost_minor,
        kind: LedgerKind::Supplier,
        status: purchase.payment_status.as_str().to_string(),
        flow,
        remaining_due_minor: Some(purchase.remaining_due_minor),
        paid_amount_minor: Some(purchase.paid_amount_minor),
    }
}

/// Merges the three projected streams into one timeline, newest first.
pub fn unify(
    transactions: &[Transaction],
    dues: &[Due],
    purchases: &[SupplierPurchase],
) -> Vec<LedgerEntry> {
    let mut ledger: Vec<LedgerEntry> =
        Vec::with_capacity(transactions.len() + dues.len() + purchases.len());

    ledger.extend(transactions.iter().map(project_transaction));
    ledger.extend(dues.iter().map(project_due));
    ledger.extend(purchases.iter().map(project_purchase));

    // Stable sort: ties keep the stream concatenation order.
    ledger.sort_by(|a, b| b.date.cmp(&a.date));
    ledger
}
