use axum::{
    Router,
    middleware,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{admin, auth, auth::AuthConfig, dues, suppliers, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: AuthConfig,
}

async fn health() -> &'static str {
    "OK"
}

fn router(state: ServerState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/analytics", get(admin::analytics))
        .route("/admin/ledger", get(admin::ledger))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/transactions/summary/today", get(transactions::today))
        .route("/dues", post(dues::create).get(dues::list))
        .route("/dues/{id}/pay", put(dues::pay))
        .route("/suppliers", post(suppliers::create).get(suppliers::list))
        .route("/suppliers/{id}/pay", put(suppliers::pay))
        .merge(admin_routes)
        .with_state(state)
}

pub async fn run(engine: Engine, auth: AuthConfig) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, auth, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        auth,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, auth, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("connect in-memory database");
        migration::Migrator::up(&db, None)
            .await
            .expect("run migrations");
        let engine = Engine::builder()
            .database(db)
            .build()
            .await
            .expect("build engine");

        router(ServerState {
            engine: Arc::new(engine),
            auth: AuthConfig::new("shop-secret"),
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("build request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("parse json body")
    }

    #[tokio::test]
    async fn health_answers() {
        let app = test_router().await;
        let res = app.oneshot(get_request("/health")).await.expect("request");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sale_roundtrip() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/transactions",
                json!({"kind": "sale", "amount": 30000, "paymentMode": "UPI", "title": "Parle-G"}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);
        let created = json_body(res).await;
        assert_eq!(created["kind"], "sale");
        assert_eq!(created["amount"], 30000);
        assert_eq!(created["paymentMode"], "UPI");

        let res = app
            .oneshot(get_request("/transactions?kind=sale"))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let listed = json_body(res).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn sale_without_payment_mode_is_rejected() {
        let app = test_router().await;

        let res = app
            .oneshot(json_request(
                "POST",
                "/transactions",
                json!({"kind": "sale", "amount": 500}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn due_can_be_settled() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/dues",
                json!({"customerName": "Rahul", "amount": 50000}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);
        let due = json_body(res).await;
        assert_eq!(due["status"], "pending");

        let id = due["id"].as_str().expect("due id").to_string();
        let res = app
            .clone()
            .oneshot(json_request("PUT", &format!("/dues/{id}/pay"), json!({})))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let paid = json_body(res).await;
        assert_eq!(paid["status"], "paid");

        let res = app
            .oneshot(json_request(
                "PUT",
                "/dues/00000000-0000-0000-0000-000000000000/pay",
                json!({}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn supplier_settlement_clears_remaining_due() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/suppliers",
                json!({
                    "supplierName": "Mehta & Sons",
                    "productName": "Rice bags",
                    "quantity": 10,
                    "totalCost": 100000,
                    "paidAmount": 40000,
                    "dueDate": "2026-09-15T00:00:00+05:30"
                }),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);
        let purchase = json_body(res).await;
        assert_eq!(purchase["paymentStatus"], "partial");
        assert_eq!(purchase["remainingDue"], 60000);
        assert_eq!(purchase["unitBuyPrice"], 10000);

        let id = purchase["id"].as_str().expect("purchase id").to_string();
        let res = app
            .oneshot(json_request(
                "PUT",
                &format!("/suppliers/{id}/pay"),
                json!({}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let settled = json_body(res).await;
        assert_eq!(settled["paymentStatus"], "paid");
        assert_eq!(settled["paidAmount"], 100000);
        assert_eq!(settled["remainingDue"], 0);
    }

    #[tokio::test]
    async fn admin_routes_require_a_token() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(get_request("/admin/analytics"))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({"password": "wrong"}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({"password": "shop-secret"}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let login = json_body(res).await;
        let token = login["token"].as_str().expect("token").to_string();

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/admin/analytics")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn analytics_reconciles_both_sides() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/transactions",
                json!({"kind": "sale", "amount": 30000, "paymentMode": "Cash"}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/transactions",
                json!({"kind": "expense", "amount": 12000}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/dues",
                json!({"customerName": "Rahul", "amount": 50000}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/suppliers",
                json!({
                    "supplierName": "Mehta & Sons",
                    "productName": "Rice bags",
                    "totalCost": 100000,
                    "paidAmount": 40000,
                    "dueDate": "2026-09-15T00:00:00+05:30"
                }),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({"password": "shop-secret"}),
            ))
            .await
            .expect("request");
        let login = json_body(res).await;
        let token = login["token"].as_str().expect("token").to_string();

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/analytics")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let summary = json_body(res).await;
        assert_eq!(summary["totalSales"], 30000);
        assert_eq!(summary["totalExpenses"], 12000);
        assert_eq!(summary["netProfit"], 18000);
        assert_eq!(summary["customerDuesPending"], 50000);
        assert_eq!(summary["supplierPaymentPending"], 60000);
        // 18000 - 60000 + 50000
        assert_eq!(summary["netBalance"], 8000);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/admin/ledger")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let ledger = json_body(res).await;
        let entries = ledger.as_array().expect("ledger array");
        assert_eq!(entries.len(), 4);
        for pair in entries.windows(2) {
            let newer = pair[0]["date"].as_str().expect("date");
            let older = pair[1]["date"].as_str().expect("date");
            assert!(newer >= older);
        }
    }

    #[tokio::test]
    async fn today_summary_answers() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/transactions",
                json!({"kind": "sale", "amount": 30000, "paymentMode": "Cash"}),
            ))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(get_request("/transactions/summary/today"))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::OK);
        let summary = json_body(res).await;
        assert_eq!(summary["sales"], 30000);
        assert_eq!(summary["profit"], 30000);
        assert_eq!(summary["transactions"], 1);
    }
}
