//! crates/health_reports_core/src/error.rs
//!
//! Errors surfaced by the account and report services. Every variant is
//! recoverable at the request boundary.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Username is already registered")]
    DuplicateUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in or session expired")]
    Unauthenticated,

    #[error("Invalid value for {field}: {reason}")]
    InvalidMetric { field: &'static str, reason: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to export reports: {0}")]
    Export(String),

    #[error(transparent)]
    Port(#[from] PortError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
