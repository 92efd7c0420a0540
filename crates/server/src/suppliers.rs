//! Supplier purchases API endpoints

use api_types::supplier::{
    PaymentStatus as ApiStatus, SupplierPurchaseNew, SupplierPurchaseView, SupplierQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_status(status: engine::PaymentStatus) -> ApiStatus {
    match status {
        engine::PaymentStatus::Pending => ApiStatus::Pending,
        engine::PaymentStatus::Partial => ApiStatus::Partial,
        engine::PaymentStatus::Paid => ApiStatus::Paid,
    }
}

fn map_status_in(status: ApiStatus) -> engine::PaymentStatus {
    match status {
        ApiStatus::Pending => engine::PaymentStatus::Pending,
        ApiStatus::Partial => engine::PaymentStatus::Partial,
        ApiStatus::Paid => engine::PaymentStatus::Paid,
    }
}

pub(crate) fn view(purchase: engine::SupplierPurchase) -> SupplierPurchaseView {
    SupplierPurchaseView {
        id: purchase.id,
        supplier_name: purchase.supplier_name,
        product_name: purchase.product_name,
        quantity: purchase.quantity,
        unit_buy_price: purchase.unit_buy_price_minor,
        total_cost: purchase.total_cost_minor,
        paid_amount: purchase.paid_amount_minor,
        remaining_due: purchase.remaining_due_minor,
        expected_unit_sell_price: purchase.expected_unit_sell_price_minor,
        payment_status: map_status(purchase.payment_status),
        purchase_date: purchase.purchase_date,
        due_date: purchase.due_date,
        updated_at: purchase.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierPurchaseNew>,
) -> Result<(StatusCode, Json<SupplierPurchaseView>), ServerError> {
    let purchase = state
        .engine
        .create_supplier_purchase(engine::NewSupplierPurchase {
            supplier_name: payload.supplier_name,
            product_name: payload.product_name,
            quantity: payload.quantity.unwrap_or(1),
            total_cost_minor: payload.total_cost,
            paid_amount_minor: payload.paid_amount.unwrap_or(0),
            expected_unit_sell_price_minor: payload.expected_unit_sell_price,
            due_date: payload.due_date.with_timezone(&Utc),
            purchase_date: payload.purchase_date.map(|dt| dt.with_timezone(&Utc)),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(purchase))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SupplierQuery>,
) -> Result<Json<Vec<SupplierPurchaseView>>, ServerError> {
    let purchases = state
        .engine
        .list_supplier_purchases(query.status.map(map_status_in), Some(200))
        .await?;

    Ok(Json(purchases.into_iter().map(view).collect()))
}

pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierPurchaseView>, ServerError> {
    let purchase = state.engine.settle_supplier_purchase(id, Utc::now()).await?;

    Ok(Json(view(purchase)))
}
