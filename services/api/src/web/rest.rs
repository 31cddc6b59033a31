//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the report endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody};
use crate::web::auth::{self, AuthResponse, CredentialsRequest};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use health_reports_core::analysis::{self, Analysis, Finding};
use health_reports_core::domain::{
    AuthSession, BmiCategory, CholesterolCategory, Classification, HealthMetrics, Level,
    OverallRisk, Report,
};
use health_reports_core::presentation::{LatestReport, Summary, Trends};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        health_handler,
        analyze_handler,
        create_report_handler,
        list_reports_handler,
        delete_report_handler,
        delete_all_reports_handler,
        export_csv_handler,
        summary_handler,
        trends_handler,
    ),
    components(
        schemas(
            CredentialsRequest, AuthResponse, ErrorBody, DeletedResponse,
            HealthMetrics, Classification, Report, Analysis, Finding,
            Summary, LatestReport, Trends,
            BmiCategory, Level, CholesterolCategory, OverallRisk,
        )
    ),
    tags(
        (name = "Health Reports API", description = "Personal health metric tracking.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// Returned after clearing every report of the account.
#[derive(Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: u64,
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Analyse a set of metrics without storing them.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = HealthMetrics,
    responses(
        (status = 200, description = "Classification and advice", body = Analysis),
        (status = 422, description = "A metric is out of range", body = ErrorBody)
    )
)]
pub async fn analyze_handler(
    payload: Result<Json<HealthMetrics>, JsonRejection>,
) -> Result<Json<Analysis>, ApiError> {
    let Json(metrics) = payload?;
    Ok(Json(analysis::analyze(&metrics)?))
}

//=========================================================================================
// Report Handlers (behind `require_auth`)
//=========================================================================================

/// Submit a new report for the logged-in account.
#[utoipa::path(
    post,
    path = "/reports",
    request_body = HealthMetrics,
    responses(
        (status = 201, description = "Report stored", body = Report),
        (status = 401, description = "Not logged in", body = ErrorBody),
        (status = 422, description = "A metric is out of range", body = ErrorBody)
    )
)]
pub async fn create_report_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    payload: Result<Json<HealthMetrics>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(metrics) = payload?;
    let report = state.reports.create_report(&session, metrics).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// List the account's reports, most recent first.
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "All reports of the account", body = [Report]),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn list_reports_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<Report>>, ApiError> {
    Ok(Json(state.reports.list_reports(&session).await?))
}

/// Delete one report.
#[utoipa::path(
    delete,
    path = "/reports/{id}",
    params(("id" = Uuid, Path, description = "Report identifier")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 400, description = "Identifier is not a UUID", body = ErrorBody),
        (status = 401, description = "Not logged in", body = ErrorBody),
        (status = 404, description = "No such report for this account", body = ErrorBody)
    )
)]
pub async fn delete_report_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    report_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(report_id) = report_id?;
    state.reports.delete_report(&session, report_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every report of the account.
#[utoipa::path(
    delete,
    path = "/reports",
    responses(
        (status = 200, description = "Reports deleted", body = DeletedResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn delete_all_reports_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.reports.delete_all_reports(&session).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Download the account's reports as CSV.
#[utoipa::path(
    get,
    path = "/reports/export.csv",
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn export_csv_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = state.reports.export_csv(&session).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=health_reports.csv",
            ),
        ],
        csv,
    ))
}

/// Latest metrics with categories and advice.
#[utoipa::path(
    get,
    path = "/reports/summary",
    responses(
        (status = 200, description = "Summary of the latest report", body = Summary),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Summary>, ApiError> {
    Ok(Json(state.reports.summary(&session).await?))
}

/// Per-metric series for charting, oldest first.
#[utoipa::path(
    get,
    path = "/reports/trends",
    responses(
        (status = 200, description = "Chart series", body = Trends),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn trends_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Trends>, ApiError> {
    Ok(Json(state.reports.trends(&session).await?))
}
