//! Wire types shared between the server and its clients.
//!
//! All monetary fields are integer minor units (paise). Field names are
//! camelCase to match the JSON the shop frontend already speaks.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a sale was paid at the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Sale,
        Expense,
    }

    /// Request body for recording a sale or expense.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount: i64,
        pub title: Option<String>,
        pub category: Option<String>,
        pub quantity: Option<i64>,
        pub payment_mode: Option<PaymentMode>,
        /// Defaults to the server clock when omitted.
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount: i64,
        pub title: Option<String>,
        pub category: Option<String>,
        pub quantity: i64,
        pub payment_mode: Option<PaymentMode>,
        pub occurred_at: DateTime<Utc>,
    }

    /// Calendar window for transaction listings, anchored to the server's
    /// local day.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Period {
        Daily,
        Weekly,
        Monthly,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionQuery {
        pub kind: Option<TransactionKind>,
        pub period: Option<Period>,
    }

    /// Rollup of today's counter activity.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TodaySummary {
        pub sales: i64,
        pub expenses: i64,
        pub profit: i64,
        pub dues: i64,
        pub transactions: u64,
    }
}

pub mod due {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DueStatus {
        Pending,
        Paid,
    }

    /// Request body for opening a customer credit record.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DueNew {
        pub customer_name: String,
        pub amount: i64,
        pub description: Option<String>,
        pub due_date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DueView {
        pub id: Uuid,
        pub customer_name: String,
        pub amount: i64,
        pub description: Option<String>,
        pub status: DueStatus,
        pub due_date: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DueQuery {
        pub status: Option<DueStatus>,
    }
}

pub mod supplier {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentStatus {
        Pending,
        Partial,
        Paid,
    }

    /// Request body for recording a stock purchase from a supplier.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SupplierPurchaseNew {
        pub supplier_name: String,
        pub product_name: String,
        pub quantity: Option<i64>,
        pub total_cost: i64,
        pub paid_amount: Option<i64>,
        pub expected_unit_sell_price: Option<i64>,
        pub purchase_date: Option<DateTime<FixedOffset>>,
        pub due_date: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SupplierPurchaseView {
        pub id: Uuid,
        pub supplier_name: String,
        pub product_name: String,
        pub quantity: i64,
        pub unit_buy_price: i64,
        pub total_cost: i64,
        pub paid_amount: i64,
        pub remaining_due: i64,
        pub expected_unit_sell_price: Option<i64>,
        pub payment_status: PaymentStatus,
        pub purchase_date: DateTime<Utc>,
        pub due_date: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SupplierQuery {
        pub status: Option<PaymentStatus>,
    }
}

pub mod analytics {
    use super::*;

    /// All-time totals plus the outstanding amounts on both sides of the
    /// counter.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalyticsSummary {
        pub total_sales: i64,
        pub total_expenses: i64,
        pub net_profit: i64,
        pub net_balance: i64,
        pub customer_dues_pending: i64,
        pub supplier_payment_pending: i64,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerKind {
        Sale,
        Expense,
        Due,
        Supplier,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerFlow {
        In,
        Out,
        Pending,
        Partial,
    }

    /// One row of the unified money-movement view.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LedgerEntryView {
        pub id: Uuid,
        pub date: DateTime<Utc>,
        pub title: String,
        pub amount: i64,
        pub kind: LedgerKind,
        pub status: String,
        pub flow: LedgerFlow,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub remaining_due: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub paid_amount: Option<i64>,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub message: String,
        pub token: String,
    }
}
