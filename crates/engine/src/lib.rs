//! Core bookkeeping engine for a small retail shop.
//!
//! Three independently evolving record streams (transactions, customer dues,
//! supplier purchases) are owned by the persistence layer; the engine runs
//! every create/transition against it and computes the read-side views
//! (analytics summaries and the unified master ledger) from per-request
//! snapshots.

use chrono::{DateTime, Local, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

pub use analytics::{AnalyticsSummary, TodaySummary};
pub use dues::{Due, DueStatus};
pub use error::EngineError;
pub use ledger::{LEDGER_STREAM_CAP, LedgerEntry, LedgerFlow, LedgerKind};
pub use suppliers::{PaymentStatus, SupplierPurchase};
pub use transactions::{PaymentMode, Transaction, TransactionKind};
use uuid::Uuid;

pub mod analytics;
pub mod dues;
pub mod ledger;
pub mod suppliers;
pub mod transactions;

mod error;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Fields accepted when recording a new sale or expense.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub payment_mode: Option<PaymentMode>,
    /// Defaults to now when absent.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Fields accepted when recording a new supplier purchase.
#[derive(Clone, Debug)]
pub struct NewSupplierPurchase {
    pub supplier_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_cost_minor: i64,
    pub paid_amount_minor: i64,
    pub expected_unit_sell_price_minor: Option<i64>,
    pub due_date: DateTime<Utc>,
    /// Defaults to now when absent.
    pub purchase_date: Option<DateTime<Utc>>,
}

/// Read filter for the transaction stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Records a sale or expense. Transactions are immutable once created.
    pub async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        let tx = Transaction::new(
            new.kind,
            new.amount_minor,
            new.title,
            new.category,
            new.quantity,
            new.payment_mode,
            new.occurred_at.unwrap_or_else(Utc::now),
        )?;

        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;
        tracing::debug!(id = %tx.id, kind = tx.kind.as_str(), "transaction recorded");
        Ok(tx)
    }

    /// Lists transactions, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt)
            .limit(limit);

        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredAt.lt(to));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Records a new customer due; it starts `Pending`.
    pub async fn create_due(
        &self,
        customer_name: &str,
        amount_minor: i64,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> ResultEngine<Due> {
        let due = Due::new(customer_name, amount_minor, description, due_date, Utc::now())?;

        dues::ActiveModel::from(&due).insert(&self.database).await?;
        tracing::debug!(id = %due.id, customer = %due.customer_name, "due recorded");
        Ok(due)
    }

    /// Lists dues, newest first, optionally restricted to one status.
    pub async fn list_dues(
        &self,
        status: Option<DueStatus>,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Due>> {
        let mut query = dues::Entity::find()
            .order_by_desc(dues::Column::CreatedAt)
            .limit(limit);

        if let Some(status) = status {
            query = query.filter(dues::Column::Status.eq(status.as_str()));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Due::try_from)
            .collect()
    }

    /// Marks a due as paid; `paid_at` becomes its payment moment.
    ///
    /// There is deliberately no already-paid guard: the write re-executes and
    /// lands on the same terminal state.
    pub async fn mark_due_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> ResultEngine<Due> {
        let model = dues::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("due".to_string()))?;

        let updated = dues::ActiveModel {
            id: ActiveValue::Set(model.id),
            status: ActiveValue::Set(DueStatus::Paid.as_str().to_string()),
            updated_at: ActiveValue::Set(paid_at),
            ..Default::default()
        }
        .update(&self.database)
        .await?;

        tracing::info!(%id, "due marked paid");
        Due::try_from(updated)
    }

    /// Records a supplier purchase, deriving unit price, remaining due, and
    /// payment status from the amounts.
    pub async fn create_supplier_purchase(
        &self,
        new: NewSupplierPurchase,
    ) -> ResultEngine<SupplierPurchase> {
        let purchase = SupplierPurchase::new(
            &new.supplier_name,
            &new.product_name,
            new.quantity,
            new.total_cost_minor,
            new.paid_amount_minor,
            new.expected_unit_sell_price_minor,
            new.due_date,
            new.purchase_date.unwrap_or_else(Utc::now),
        )?;

        suppliers::ActiveModel::from(&purchase)
            .insert(&self.database)
            .await?;
        tracing::debug!(id = %purchase.id, supplier = %purchase.supplier_name, "purchase recorded");
        Ok(purchase)
    }

    /// Lists supplier purchases, newest purchase first, optionally restricted
    /// to one payment status.
    pub async fn list_supplier_purchases(
        &self,
        status: Option<PaymentStatus>,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<SupplierPurchase>> {
        let mut query = suppliers::Entity::find()
            .order_by_desc(suppliers::Column::PurchaseDate)
            .limit(limit);

        if let Some(status) = status {
            query = query.filter(suppliers::Column::PaymentStatus.eq(status.as_str()));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(SupplierPurchase::try_from)
            .collect()
    }

    /// Settles a supplier purchase in full (the "close the books" operation).
    ///
    /// Idempotent once paid: re-settling yields the same terminal record.
    pub async fn settle_supplier_purchase(
        &self,
        id: Uuid,
        settled_at: DateTime<Utc>,
    ) -> ResultEngine<SupplierPurchase> {
        let model = suppliers::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("supplier purchase".to_string()))?;

        let mut purchase = SupplierPurchase::try_from(model)?;
        purchase.settle(settled_at);

        let updated = suppliers::ActiveModel {
            id: ActiveValue::Set(purchase.id.to_string()),
            paid_amount_minor: ActiveValue::Set(purchase.paid_amount_minor),
            remaining_due_minor: ActiveValue::Set(purchase.remaining_due_minor),
            payment_status: ActiveValue::Set(purchase.payment_status.as_str().to_string()),
            updated_at: ActiveValue::Set(purchase.updated_at),
            ..Default::default()
        }
        .update(&self.database)
        .await?;

        tracing::info!(%id, "supplier purchase settled");
        SupplierPurchase::try_from(updated)
    }

    /// Shop-wide analytics over all three streams.
    pub async fn analytics(&self) -> ResultEngine<AnalyticsSummary> {
        let (transactions, dues, purchases) = self.snapshot_all().await?;
        Ok(analytics::summarize(&transactions, &dues, &purchases))
    }

    /// Dashboard summary for the local calendar day containing `now`.
    pub async fn today_summary(&self, now: DateTime<Local>) -> ResultEngine<TodaySummary> {
        let (day_start, day_end) = analytics::local_day_bounds(now);

        let filter = TransactionFilter {
            kind: None,
            from: Some(day_start),
            to: Some(day_end),
        };
        let transactions = self.list_transactions(&filter, None).await?;
        let dues = self.list_dues(Some(DueStatus::Pending), None).await?;

        Ok(analytics::summarize_day(
            &transactions,
            &dues,
            day_start,
            day_end,
        ))
    }

    /// The unified master ledger, newest first.
    ///
    /// Bounded to the most recent [`LEDGER_STREAM_CAP`] records per stream;
    /// dues and purchases are windowed by last activity (`updated_at`) so a
    /// freshly settled old record still shows up.
    pub async fn master_ledger(&self) -> ResultEngine<Vec<LedgerEntry>> {
        let transactions: Vec<Transaction> = transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt)
            .limit(LEDGER_STREAM_CAP)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<_>>()?;

        let dues: Vec<Due> = dues::Entity::find()
            .order_by_desc(dues::Column::UpdatedAt)
            .limit(LEDGER_STREAM_CAP)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Due::try_from)
            .collect::<ResultEngine<_>>()?;

        let purchases: Vec<SupplierPurchase> = suppliers::Entity::find()
            .order_by_desc(suppliers::Column::UpdatedAt)
            .limit(LEDGER_STREAM_CAP)
            .all(&self.database)
            .await?
            .into_iter()
            .map(SupplierPurchase::try_from)
            .collect::<ResultEngine<_>>()?;

        Ok(ledger::unify(&transactions, &dues, &purchases))
    }

    async fn snapshot_all(
        &self,
    ) -> ResultEngine<(Vec<Transaction>, Vec<Due>, Vec<SupplierPurchase>)> {
        let transactions = transactions::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<_>>()?;

        let dues = dues::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Due::try_from)
            .collect::<ResultEngine<_>>()?;

        let purchases = suppliers::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(SupplierPurchase::try_from)
            .collect::<ResultEngine<_>>()?;

        Ok((transactions, dues, purchases))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
