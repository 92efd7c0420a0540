//! Analytics aggregation over the three record streams.
//!
//! Pure functions: they take already-fetched snapshots and reduce them to
//! scalar summaries. The engine facade is responsible for fetching.

use chrono::{DateTime, Days, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    dues::{Due, DueStatus},
    suppliers::{PaymentStatus, SupplierPurchase},
    transactions::{Transaction, TransactionKind},
};

/// Shop-wide summary across all time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_sales_minor: i64,
    pub total_expenses_minor: i64,
    pub net_profit_minor: i64,
    /// Forward-looking liquidity estimate, not realized cash: unpaid customer
    /// dues count as recoverable future cash (added), unpaid supplier bills
    /// as future outflow (subtracted).
    pub net_balance_minor: i64,
    pub customer_dues_pending_minor: i64,
    pub supplier_payment_pending_minor: i64,
}

/// Summary scoped to a single calendar day, for the home dashboard.
///
/// `pending_dues_minor` is the global pending total, not day-scoped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub sales_minor: i64,
    pub expenses_minor: i64,
    pub profit_minor: i64,
    pub pending_dues_minor: i64,
    pub transactions: u64,
}

fn partition_totals(transactions: &[Transaction]) -> (i64, i64) {
    transactions.iter().fold((0, 0), |(sales, expenses), tx| {
        match tx.kind {
            TransactionKind::Sale => (sales + tx.amount_minor, expenses),
            TransactionKind::Expense => (sales, expenses + tx.amount_minor),
        }
    })
}

fn pending_dues_total(dues: &[Due]) -> i64 {
    dues.iter()
        .filter(|due| due.status == DueStatus::Pending)
        .map(|due| due.amount_minor)
        .sum()
}

/// Reduces the three streams into the shop-wide summary.
///
/// `net_balance = (sales - expenses) - supplier_pending + dues_pending`; the
/// signs are the contract, do not "fix" them.
pub fn summarize(
    transactions: &[Transaction],
    dues: &[Due],
    purchases: &[SupplierPurchase],
) -> AnalyticsSummary {
    let (total_sales_minor, total_expenses_minor) = partition_totals(transactions);
    let customer_dues_pending_minor = pending_dues_total(dues);
    let supplier_payment_pending_minor = purchases
        .iter()
        .filter(|p| p.payment_status != PaymentStatus::Paid)
        .map(|p| p.remaining_due_minor)
        .sum();

    let net_profit_minor = total_sales_minor - total_expenses_minor;
    let net_balance_minor =
        net_profit_minor - supplier_payment_pending_minor + customer_dues_pending_minor;

    AnalyticsSummary {
        total_sales_minor,
        total_expenses_minor,
        net_profit_minor,
        net_balance_minor,
        customer_dues_pending_minor,
        supplier_payment_pending_minor,
    }
}

/// Reduces transactions within `[day_start, day_end)` plus the global pending
/// dues into the dashboard summary.
pub fn summarize_day(
    transactions: &[Transaction],
    dues: &[Due],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> TodaySummary {
    let today: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.occurred_at >= day_start && tx.occurred_at < day_end)
        .collect();

    let (sales_minor, expenses_minor) = today.iter().fold((0, 0), |(sales, expenses), tx| {
        match tx.kind {
            TransactionKind::Sale => (sales + tx.amount_minor, expenses),
            TransactionKind::Expense => (sales, expenses + tx.amount_minor),
        }
    });

    TodaySummary {
        sales_minor,
        expenses_minor,
        profit_minor: sales_minor - expenses_minor,
        pending_dues_minor: pending_dues_total(dues),
        transactions: today.len() as u64,
    }
}

/// The `[start, end)` UTC bounds of the local calendar day containing `now`.
///
/// Midnight-to-midnight in the shop's local timezone, per the dashboard
/// contract. Falls back to the instant itself around DST gaps.
pub fn local_day_bounds(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| now.naive_local());
    let start = midnight
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now);
    let end = start
        .checked_add_days(Days::new(1))
        .unwrap_or(start);
    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}
