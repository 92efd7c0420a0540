//! Customer dues API endpoints

use api_types::due::{DueNew, DueQuery, DueStatus as ApiStatus, DueView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_status(status: engine::DueStatus) -> ApiStatus {
    match status {
        engine::DueStatus::Pending => ApiStatus::Pending,
        engine::DueStatus::Paid => ApiStatus::Paid,
    }
}

fn map_status_in(status: ApiStatus) -> engine::DueStatus {
    match status {
        ApiStatus::Pending => engine::DueStatus::Pending,
        ApiStatus::Paid => engine::DueStatus::Paid,
    }
}

pub(crate) fn view(due: engine::Due) -> DueView {
    DueView {
        id: due.id,
        customer_name: due.customer_name,
        amount: due.amount_minor,
        description: due.description,
        status: map_status(due.status),
        due_date: due.due_date,
        created_at: due.created_at,
        updated_at: due.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DueNew>,
) -> Result<(StatusCode, Json<DueView>), ServerError> {
    let due = state
        .engine
        .create_due(
            &payload.customer_name,
            payload.amount,
            payload.description,
            payload.due_date.map(|dt| dt.with_timezone(&Utc)),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(due))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<DueView>>, ServerError> {
    let dues = state
        .engine
        .list_dues(query.status.map(map_status_in), Some(200))
        .await?;

    Ok(Json(dues.into_iter().map(view).collect()))
}

pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DueView>, ServerError> {
    let due = state.engine.mark_due_paid(id, Utc::now()).await?;

    Ok(Json(view(due)))
}
