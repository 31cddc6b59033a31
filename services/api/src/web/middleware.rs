//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;
use health_reports_core::ServiceError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Reads the session token out of the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
}

/// Middleware that validates the session cookie.
///
/// If valid, inserts the `AuthSession` into request extensions for handlers to use.
/// If invalid, expired or missing, responds with 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers()).ok_or(ServiceError::Unauthenticated)?;
    let session = state.accounts.resolve_session(token).await?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
