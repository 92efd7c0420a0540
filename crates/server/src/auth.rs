//! Admin authentication.
//!
//! The shop has a single admin password. A successful login hands out an
//! opaque bearer token carrying its own expiry plus an HMAC tag keyed by
//! the password; the token is verified statelessly on every `/admin`
//! request, so nothing is kept server-side and the password itself never
//! leaves the server.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{ServerError, server::ServerState};
use api_types::auth::{LoginRequest, LoginResponse};

/// Issued tokens stay valid this long.
const TOKEN_TTL_DAYS: i64 = 30;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct AuthConfig {
    admin_password: String,
}

impl AuthConfig {
    pub fn new(admin_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
        }
    }

    // HMAC-SHA256 accepts keys of any length, so this never returns None
    // in practice; the Option keeps the call sites free of panics.
    fn keyed_mac(&self, expiry: i64) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.admin_password.as_bytes()).ok()?;
        mac.update(expiry.to_string().as_bytes());
        Some(mac)
    }

    fn issue_token(&self, now: DateTime<Utc>) -> String {
        let expiry = (now + Duration::days(TOKEN_TTL_DAYS)).timestamp();
        let encoder = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let tag = self
            .keyed_mac(expiry)
            .map(|mac| encoder.encode(mac.finalize().into_bytes()))
            .unwrap_or_default();
        encoder.encode(format!("{expiry}:{tag}"))
    }

    fn verify_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        let decoder = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let Ok(bytes) = decoder.decode(token) else {
            return false;
        };
        let Ok(raw) = String::from_utf8(bytes) else {
            return false;
        };
        let Some((expiry, tag)) = raw.split_once(':') else {
            return false;
        };
        let Ok(expiry) = expiry.parse::<i64>() else {
            return false;
        };
        let Ok(tag) = decoder.decode(tag) else {
            return false;
        };
        let Some(mac) = self.keyed_mac(expiry) else {
            return false;
        };

        expiry > now.timestamp() && mac.verify_slice(&tag).is_ok()
    }
}

/// Handles `POST /auth/login`.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    if payload.password != state.auth.admin_password {
        return Err(ServerError::Unauthorized);
    }

    tracing::info!("admin login");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: state.auth.issue_token(Utc::now()),
    }))
}

/// Middleware guarding the `/admin` routes.
pub async fn require_admin(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(bearer) = bearer else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if !state.auth.verify_token(bearer.token(), Utc::now()) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
