//! Admin API endpoints

use api_types::{
    analytics::AnalyticsSummary,
    ledger::{LedgerEntryView, LedgerFlow, LedgerKind},
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

fn map_ledger_kind(kind: engine::LedgerKind) -> LedgerKind {
    match kind {
        engine::LedgerKind::Sale => LedgerKind::Sale,
        engine::LedgerKind::Expense => LedgerKind::Expense,
        engine::LedgerKind::Due => LedgerKind::Due,
        engine::LedgerKind::Supplier => LedgerKind::Supplier,
    }
}

fn map_ledger_flow(flow: engine::LedgerFlow) -> LedgerFlow {
    match flow {
        engine::LedgerFlow::In => LedgerFlow::In,
        engine::LedgerFlow::Out => LedgerFlow::Out,
        engine::LedgerFlow::Pending => LedgerFlow::Pending,
        engine::LedgerFlow::Partial => LedgerFlow::Partial,
    }
}

pub async fn analytics(
    State(state): State<ServerState>,
) -> Result<Json<AnalyticsSummary>, ServerError> {
    let summary = state.engine.analytics().await?;

    Ok(Json(AnalyticsSummary {
        total_sales: summary.total_sales_minor,
        total_expenses: summary.total_expenses_minor,
        net_profit: summary.net_profit_minor,
        net_balance: summary.net_balance_minor,
        customer_dues_pending: summary.customer_dues_pending_minor,
        supplier_payment_pending: summary.supplier_payment_pending_minor,
    }))
}

pub async fn ledger(
    State(state): State<ServerState>,
) -> Result<Json<Vec<LedgerEntryView>>, ServerError> {
    let entries = state.engine.master_ledger().await?;

    let views = entries
        .into_iter()
        .map(|entry| LedgerEntryView {
            id: entry.id,
            date: entry.date,
            title: entry.title,
            amount: entry.amount_minor,
            kind: map_ledger_kind(entry.kind),
            status: entry.status,
            flow: map_ledger_flow(entry.flow),
            remaining_due: entry.remaining_due_minor,
            paid_amount: entry.paid_amount_minor,
        })
        .collect();

    Ok(Json(views))
}
