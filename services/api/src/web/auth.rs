//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};
use crate::web::middleware::{session_token, SESSION_COOKIE};
use crate::web::state::AppState;
use health_reports_core::SignedIn;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Absent fields decode as blank and are rejected by the account service.
#[derive(Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub account_id: Uuid,
    pub username: String,
}

//=========================================================================================
// Cookie Helpers
//=========================================================================================

fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure = if secure { " Secure;" } else { "" };
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly;{secure} SameSite=Lax; Path=/; Max-Age={max_age_secs}"
    )
}

fn signed_in_response(
    state: &AppState,
    status: StatusCode,
    signed_in: SignedIn,
) -> impl IntoResponse {
    let cookie = session_cookie(
        &signed_in.session.token,
        state.config.session_ttl().num_seconds(),
        state.config.cookie_secure,
    );
    let response = AuthResponse {
        account_id: signed_in.account.id,
        username: signed_in.account.username,
    };
    (status, [(header::SET_COOKIE, cookie)], Json(response))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new account and log it in
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = AuthResponse),
        (status = 400, description = "Username or password missing", body = ErrorBody),
        (status = 409, description = "Username already registered", body = ErrorBody)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let signed_in = state.accounts.register(&req.username, &req.password).await?;
    Ok(signed_in_response(&state, StatusCode::CREATED, signed_in))
}

/// POST /auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let signed_in = state.accounts.login(&req.username, &req.password).await?;
    info!("Account {} logged in", signed_in.account.id);
    Ok(signed_in_response(&state, StatusCode::OK, signed_in))
}

/// POST /auth/logout - Invalidate the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session invalidated and cookie cleared")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = session_token(&headers) {
        state.accounts.logout(token).await?;
    }
    let cookie = session_cookie("", 0, state.config.cookie_secure);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}
