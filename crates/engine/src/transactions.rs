//! Transaction primitives.
//!
//! A `Transaction` is a discrete sale or expense event. It is immutable once
//! created; corrections happen by entering a compensating record.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sale" => Ok(Self::Sale),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// How a sale was collected. Only sales carry a payment mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
        }
    }
}

impl TryFrom<&str> for PaymentMode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Cash" => Ok(Self::Cash),
            "UPI" => Ok(Self::Upi),
            other => Err(EngineError::Validation(format!(
                "invalid payment mode: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    /// Amount in minor units (paise). Never negative.
    pub amount_minor: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub quantity: i64,
    /// `Some` iff `kind` is `Sale`.
    pub payment_mode: Option<PaymentMode>,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount_minor: i64,
        title: Option<String>,
        category: Option<String>,
        quantity: Option<i64>,
        payment_mode: Option<PaymentMode>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_minor < 0 {
            return Err(EngineError::Validation(
                "amount must not be negative".to_string(),
            ));
        }
        let quantity = quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(EngineError::Validation(
                "quantity must be > 0".to_string(),
            ));
        }
        let payment_mode = match kind {
            TransactionKind::Sale => Some(payment_mode.ok_or_else(|| {
                EngineError::Validation("payment mode is required for sales".to_string())
            })?),
            // Expenses never carry a payment mode, even if the caller sent one.
            TransactionKind::Expense => None,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount_minor,
            title: util::normalize_optional_text(title.as_deref()),
            category: util::normalize_optional_text(category.as_deref()),
            quantity,
            payment_mode,
            occurred_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub quantity: i64,
    pub payment_mode: Option<String>,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            title: ActiveValue::Set(tx.title.clone()),
            category: ActiveValue::Set(tx.category.clone()),
            quantity: ActiveValue::Set(tx.quantity),
            payment_mode: ActiveValue::Set(tx.payment_mode.map(|m| m.as_str().to_string())),
            occurred_at: ActiveValue::Set(tx.occurred_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "transaction")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            title: model.title,
            category: model.category,
            quantity: model.quantity,
            payment_mode: model
                .payment_mode
                .as_deref()
                .map(PaymentMode::try_from)
                .transpose()?,
            occurred_at: model.occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(amount_minor: i64) -> ResultEngine<Transaction> {
        Transaction::new(
            TransactionKind::Sale,
            amount_minor,
            Some("Rice 5kg".to_string()),
            None,
            None,
            Some(PaymentMode::Cash),
            Utc::now(),
        )
    }

    #[test]
    fn sale_defaults_quantity_to_one() {
        let tx = sale(30_000).unwrap();
        assert_eq!(tx.quantity, 1);
        assert_eq!(tx.payment_mode, Some(PaymentMode::Cash));
    }

    #[test]
    fn sale_without_payment_mode_is_rejected() {
        let err = Transaction::new(
            TransactionKind::Sale,
            30_000,
            None,
            None,
            None,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("payment mode is required for sales".to_string())
        );
    }

    #[test]
    fn expense_drops_payment_mode() {
        let tx = Transaction::new(
            TransactionKind::Expense,
            12_000,
            Some("Electricity Bill".to_string()),
            Some("Rent".to_string()),
            Some(1),
            Some(PaymentMode::Upi),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(tx.payment_mode, None);
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(sale(-1).is_err());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let err = Transaction::new(
            TransactionKind::Sale,
            100,
            None,
            None,
            Some(0),
            Some(PaymentMode::Upi),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::Validation("quantity must be > 0".to_string()));
    }

    #[test]
    fn blank_title_normalizes_to_none() {
        let tx = Transaction::new(
            TransactionKind::Sale,
            100,
            Some("   ".to_string()),
            None,
            None,
            Some(PaymentMode::Cash),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(tx.title, None);
    }
}
