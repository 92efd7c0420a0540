//! Transactions API endpoints

use api_types::transaction::{
    Period, TodaySummary, TransactionKind as ApiKind, TransactionNew, TransactionQuery,
    TransactionView,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{Datelike, Days, Local, Utc};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Sale => ApiKind::Sale,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_kind_in(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Sale => engine::TransactionKind::Sale,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

pub(crate) fn map_mode(mode: engine::PaymentMode) -> api_types::PaymentMode {
    match mode {
        engine::PaymentMode::Cash => api_types::PaymentMode::Cash,
        engine::PaymentMode::Upi => api_types::PaymentMode::Upi,
    }
}

fn map_mode_in(mode: api_types::PaymentMode) -> engine::PaymentMode {
    match mode {
        api_types::PaymentMode::Cash => engine::PaymentMode::Cash,
        api_types::PaymentMode::Upi => engine::PaymentMode::Upi,
    }
}

pub(crate) fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount: tx.amount_minor,
        title: tx.title,
        category: tx.category,
        quantity: tx.quantity,
        payment_mode: tx.payment_mode.map(map_mode),
        occurred_at: tx.occurred_at,
    }
}

/// Start of the listing window for a calendar period, in the server's local
/// timezone.
fn period_start(period: Period, now: chrono::DateTime<Local>) -> chrono::DateTime<Utc> {
    let today = now.date_naive();
    let start_day = match period {
        Period::Daily => today,
        Period::Weekly => today - Days::new(7),
        Period::Monthly => today.with_day(1).unwrap_or(today),
    };

    start_day
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(now.timezone()).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(engine::NewTransaction {
            kind: map_kind_in(payload.kind),
            amount_minor: payload.amount,
            title: payload.title,
            category: payload.category,
            quantity: payload.quantity,
            payment_mode: payload.payment_mode.map(map_mode_in),
            occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = engine::TransactionFilter {
        kind: query.kind.map(map_kind_in),
        from: query.period.map(|period| period_start(period, Local::now())),
        to: None,
    };

    let txs = state.engine.list_transactions(&filter, Some(200)).await?;

    Ok(Json(txs.into_iter().map(view).collect()))
}

pub async fn today(
    State(state): State<ServerState>,
) -> Result<Json<TodaySummary>, ServerError> {
    let summary = state.engine.today_summary(Local::now()).await?;

    Ok(Json(TodaySummary {
        sales: summary.sales_minor,
        expenses: summary.expenses_minor,
        profit: summary.profit_minor,
        dues: summary.pending_dues_minor,
        transactions: summary.transactions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn monthly_period_starts_on_the_first() {
        let now = Local.with_ymd_and_hms(2026, 8, 30, 15, 0, 0).unwrap();
        let start = period_start(Period::Monthly, now).with_timezone(&Local);
        assert_eq!(start.date_naive(), now.date_naive().with_day(1).unwrap());
        assert_eq!(start.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn weekly_period_starts_seven_days_back() {
        let now = Local.with_ymd_and_hms(2026, 8, 30, 15, 0, 0).unwrap();
        let start = period_start(Period::Weekly, now).with_timezone(&Local);
        assert_eq!(start.date_naive(), now.date_naive() - Days::new(7));
        assert_eq!(start.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn daily_period_starts_at_local_midnight() {
        let now = Local.with_ymd_and_hms(2026, 8, 30, 15, 0, 0).unwrap();
        let start = period_start(Period::Daily, now).with_timezone(&Local);
        assert_eq!(start.date_naive(), now.date_naive());
        assert_eq!(start.time(), chrono::NaiveTime::MIN);
    }
}
