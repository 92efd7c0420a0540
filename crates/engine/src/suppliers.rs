//! Supplier purchase primitives.
//!
//! A `SupplierPurchase` is stock bought on credit, possibly paid partially at
//! purchase time. Its payment lifecycle is a three-state machine
//! `Pending -> Partial -> Paid` where `Paid` is terminal and the status is a
//! pure function of `(paid_amount, total_cost)`.
//!
//! There is no partial top-up operation: after the initial purchase-time
//! payment, the only transition is [`SupplierPurchase::settle`], which closes
//! the books by forcing full settlement.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Derives the status from the paid/total pair.
    ///
    /// This is the single source of truth for the state machine:
    /// `paid <= 0` is pending, `0 < paid < total` is partial,
    /// `paid >= total` is paid.
    pub fn from_amounts(paid_minor: i64, total_cost_minor: i64) -> Self {
        if paid_minor <= 0 {
            Self::Pending
        } else if paid_minor < total_cost_minor {
            Self::Partial
        } else {
            Self::Paid
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::Validation(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierPurchase {
    pub id: Uuid,
    pub supplier_name: String,
    pub product_name: String,
    pub quantity: i64,
    /// `total_cost_minor / quantity`, derived at creation.
    pub unit_buy_price_minor: i64,
    pub total_cost_minor: i64,
    pub paid_amount_minor: i64,
    /// `max(total_cost_minor - paid_amount_minor, 0)`.
    pub remaining_due_minor: i64,
    pub expected_unit_sell_price_minor: Option<i64>,
    pub payment_status: PaymentStatus,
    pub purchase_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierPurchase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        supplier_name: &str,
        product_name: &str,
        quantity: i64,
        total_cost_minor: i64,
        paid_amount_minor: i64,
        expected_unit_sell_price_minor: Option<i64>,
        due_date: DateTime<Utc>,
        purchase_date: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let supplier_name = util::normalize_required_name(supplier_name, "supplier name")?;
        let product_name = util::normalize_required_name(product_name, "product name")?;
        if total_cost_minor <= 0 {
            return Err(EngineError::Validation(
                "total cost must be > 0".to_string(),
            ));
        }
        if quantity <= 0 {
            return Err(EngineError::Validation(
                "quantity must be > 0".to_string(),
            ));
        }
        if paid_amount_minor < 0 {
            return Err(EngineError::Validation(
                "paid amount must not be negative".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            supplier_name,
            product_name,
            quantity,
            unit_buy_price_minor: total_cost_minor / quantity,
            total_cost_minor,
            paid_amount_minor,
            remaining_due_minor: (total_cost_minor - paid_amount_minor).max(0),
            expected_unit_sell_price_minor,
            payment_status: PaymentStatus::from_amounts(paid_amount_minor, total_cost_minor),
            purchase_date,
            due_date,
            updated_at: purchase_date,
        })
    }

    /// Closes the books on this purchase.
    ///
    /// Unconditionally forces full settlement: `paid = total`, `remaining = 0`,
    /// status `Paid`, regardless of the current remaining due. Re-settling an
    /// already-paid purchase yields the same terminal state (only `updated_at`
    /// advances).
    pub fn settle(&mut self, settled_at: DateTime<Utc>) {
        self.paid_amount_minor = self.total_cost_minor;
        self.remaining_due_minor = 0;
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = settled_at;
    }

    /// The timestamp the ledger shows for this purchase: the settlement moment
    /// once paid, the purchase moment otherwise.
    pub fn effective_date(&self) -> DateTime<Utc> {
        match self.payment_status {
            PaymentStatus::Paid => self.updated_at,
            _ => self.purchase_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "supplier_purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub supplier_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_buy_price_minor: i64,
    pub total_cost_minor: i64,
    pub paid_amount_minor: i64,
    pub remaining_due_minor: i64,
    pub expected_unit_sell_price_minor: Option<i64>,
    pub payment_status: String,
    pub purchase_date: DateTimeUtc,
    pub due_date: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SupplierPurchase> for ActiveModel {
    fn from(purchase: &SupplierPurchase) -> Self {
        Self {
            id: ActiveValue::Set(purchase.id.to_string()),
            supplier_name: ActiveValue::Set(purchase.supplier_name.clone()),
            product_name: ActiveValue::Set(purchase.product_name.clone()),
            quantity: ActiveValue::Set(purchase.quantity),
            unit_buy_price_minor: ActiveValue::Set(purchase.unit_buy_price_minor),
            total_cost_minor: ActiveValue::Set(purchase.total_cost_minor),
            paid_amount_minor: ActiveValue::Set(purchase.paid_amount_minor),
            remaining_due_minor: ActiveValue::Set(purchase.remaining_due_minor),
            expected_unit_sell_price_minor: ActiveValue::Set(
                purchase.expected_unit_sell_price_minor,
            ),
            payment_status: ActiveValue::Set(purchase.payment_status.as_str().to_string()),
            purchase_date: ActiveValue::Set(purchase.purchase_date),
            due_date: ActiveValue::Set(purchase.due_date),
            updated_at: ActiveValue::Set(purchase.updated_at),
        }
    }
}

impl TryFrom<Model> for SupplierPurchase {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "supplier purchase")?,
            supplier_name: model.supplier_name,
            product_name: model.product_name,
            quantity: model.quantity,
            unit_buy_price_minor: model.unit_buy_price_minor,
            total_cost_minor: model.total_cost_minor,
            paid_amount_minor: model.paid_amount_minor,
            remaining_due_minor: model.remaining_due_minor,
            expected_unit_sell_price_minor: model.expected_unit_sell_price_minor,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            purchase_date: model.purchase_date,
            due_date: model.due_date,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(total_minor: i64, paid_minor: i64) -> SupplierPurchase {
        let now = Utc::now();
        SupplierPurchase::new(
            "Sharma Traders",
            "Rice 25kg",
            5,
            total_minor,
            paid_minor,
            None,
            now + chrono::Duration::days(15),
            now,
        )
        .unwrap()
    }

    #[test]
    fn status_is_a_pure_function_of_amounts() {
        assert_eq!(PaymentStatus::from_amounts(0, 1000), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_amounts(-5, 1000), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_amounts(1, 1000), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::from_amounts(999, 1000), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::from_amounts(1000, 1000), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_amounts(1500, 1000), PaymentStatus::Paid);
    }

    #[test]
    fn partial_payment_derives_remaining_due() {
        let p = purchase(100_000, 40_000);
        assert_eq!(p.payment_status, PaymentStatus::Partial);
        assert_eq!(p.remaining_due_minor, 60_000);
        assert_eq!(p.unit_buy_price_minor, 20_000);
    }

    #[test]
    fn overpaid_purchase_clamps_remaining_due() {
        let p = purchase(100_000, 120_000);
        assert_eq!(p.payment_status, PaymentStatus::Paid);
        assert_eq!(p.remaining_due_minor, 0);
    }

    #[test]
    fn settle_forces_full_settlement() {
        let mut p = purchase(100_000, 40_000);
        p.settle(Utc::now());
        assert_eq!(p.payment_status, PaymentStatus::Paid);
        assert_eq!(p.paid_amount_minor, 100_000);
        assert_eq!(p.remaining_due_minor, 0);
    }

    // Re-settling an already-paid record is a deliberate no-effect, not an
    // error (only updated_at moves).
    #[test]
    fn settle_is_idempotent_on_terminal_state() {
        let mut p = purchase(100_000, 40_000);
        p.settle(Utc::now());
        let first = p.clone();

        p.settle(Utc::now() + chrono::Duration::hours(1));
        assert_eq!(p.paid_amount_minor, first.paid_amount_minor);
        assert_eq!(p.remaining_due_minor, first.remaining_due_minor);
        assert_eq!(p.payment_status, first.payment_status);
    }

    #[test]
    fn invalid_creation_is_rejected() {
        let now = Utc::now();
        let due = now + chrono::Duration::days(15);
        assert!(SupplierPurchase::new("", "Rice", 5, 1000, 0, None, due, now).is_err());
        assert!(SupplierPurchase::new("S", "", 5, 1000, 0, None, due, now).is_err());
        assert!(SupplierPurchase::new("S", "Rice", 0, 1000, 0, None, due, now).is_err());
        assert!(SupplierPurchase::new("S", "Rice", 5, 0, 0, None, due, now).is_err());
        assert!(SupplierPurchase::new("S", "Rice", 5, 1000, -1, None, due, now).is_err());
    }

    #[test]
    fn effective_date_tracks_settlement() {
        let mut p = purchase(100_000, 0);
        assert_eq!(p.effective_date(), p.purchase_date);

        let settled_at = p.purchase_date + chrono::Duration::days(10);
        p.settle(settled_at);
        assert_eq!(p.effective_date(), settled_at);
    }
}
