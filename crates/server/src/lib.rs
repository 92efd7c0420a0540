use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod admin;
mod auth;
mod dues;
mod server;
mod suppliers;
mod transactions;

pub use auth::AuthConfig;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            Period, TodaySummary, TransactionKind, TransactionNew, TransactionQuery,
            TransactionView,
        };
    }

    pub mod due {
        pub use api_types::due::{DueNew, DueQuery, DueStatus, DueView};
    }

    pub mod supplier {
        pub use api_types::supplier::{
            PaymentStatus, SupplierPurchaseNew, SupplierPurchaseView, SupplierQuery,
        };
    }

    pub mod analytics {
        pub use api_types::analytics::AnalyticsSummary;
    }

    pub mod ledger {
        pub use api_types::ledger::{LedgerEntryView, LedgerFlow, LedgerKind};
    }

    pub mod auth {
        pub use api_types::auth::{LoginRequest, LoginResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Unauthorized,
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom("x".to_string())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
