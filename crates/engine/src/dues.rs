//! Customer credit ("udhar") primitives.
//!
//! A `Due` is money a customer owes the shop. It is created `Pending` and
//! transitions once, irreversibly, to `Paid`. `updated_at` marks the payment
//! moment once paid.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Pending,
    Paid,
}

impl DueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for DueStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::Validation(format!(
                "invalid due status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub id: Uuid,
    pub customer_name: String,
    /// Amount in minor units (paise). Never negative.
    pub amount_minor: i64,
    pub description: Option<String>,
    pub status: DueStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Due {
    pub fn new(
        customer_name: &str,
        amount_minor: i64,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let customer_name = util::normalize_required_name(customer_name, "customer name")?;
        if amount_minor < 0 {
            return Err(EngineError::Validation(
                "amount must not be negative".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            customer_name,
            amount_minor,
            description: util::normalize_optional_text(description.as_deref()),
            status: DueStatus::Pending,
            due_date,
            created_at,
            updated_at: created_at,
        })
    }

    /// The timestamp the ledger shows for this due: the payment moment once
    /// paid, the creation moment while pending.
    pub fn effective_date(&self) -> DateTime<Utc> {
        match self.status {
            DueStatus::Paid => self.updated_at,
            DueStatus::Pending => self.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_name: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Due> for ActiveModel {
    fn from(due: &Due) -> Self {
        Self {
            id: ActiveValue::Set(due.id.to_string()),
            customer_name: ActiveValue::Set(due.customer_name.clone()),
            amount_minor: ActiveValue::Set(due.amount_minor),
            description: ActiveValue::Set(due.description.clone()),
            status: ActiveValue::Set(due.status.as_str().to_string()),
            due_date: ActiveValue::Set(due.due_date),
            created_at: ActiveValue::Set(due.created_at),
            updated_at: ActiveValue::Set(due.updated_at),
        }
    }
}

impl TryFrom<Model> for Due {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "due")?,
            customer_name: model.customer_name,
            amount_minor: model.amount_minor,
            description: model.description,
            status: DueStatus::try_from(model.status.as_str())?,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_due_starts_pending() {
        let due = Due::new("Rahul", 50_000, None, None, Utc::now()).unwrap();
        assert_eq!(due.status, DueStatus::Pending);
        assert_eq!(due.updated_at, due.created_at);
    }

    #[test]
    fn zero_amount_is_allowed() {
        assert!(Due::new("Rahul", 0, None, None, Utc::now()).is_ok());
    }

    #[test]
    fn empty_customer_name_is_rejected() {
        let err = Due::new("  ", 100, None, None, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("customer name must not be empty".to_string())
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(Due::new("Rahul", -1, None, None, Utc::now()).is_err());
    }

    #[test]
    fn effective_date_tracks_payment() {
        let created = Utc::now();
        let mut due = Due::new("Rahul", 100, None, None, created).unwrap();
        assert_eq!(due.effective_date(), created);

        let paid_at = created + chrono::Duration::days(3);
        due.status = DueStatus::Paid;
        due.updated_at = paid_at;
        assert_eq!(due.effective_date(), paid_at);
    }
}
