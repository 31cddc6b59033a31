//! crates/health_reports_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or hashers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Account, AccountCredentials, AuthSession, Report};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, hashing).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflicts with an existing item: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Account Management ---

    /// Inserts a new account. Returns `PortError::Conflict` if the username is taken.
    async fn create_account(&self, username: &str, hashed_password: &str) -> PortResult<Account>;

    async fn get_account_by_username(&self, username: &str) -> PortResult<AccountCredentials>;

    // --- Auth Sessions ---
    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()>;

    /// Looks a session up by token. Expiry is left to the caller.
    async fn get_auth_session(&self, token: &str) -> PortResult<AuthSession>;

    async fn delete_auth_session(&self, token: &str) -> PortResult<()>;

    /// Removes every session whose expiry is at or before `now`.
    async fn delete_expired_auth_sessions(&self, now: DateTime<Utc>) -> PortResult<u64>;

    // --- Report Management ---
    async fn insert_report(&self, report: &Report) -> PortResult<()>;

    /// All reports of one account, most recent first.
    async fn list_reports_for_account(&self, account_id: Uuid) -> PortResult<Vec<Report>>;

    /// Deletes a report only if it belongs to `account_id`. Returns whether a row was removed.
    async fn delete_report(&self, account_id: Uuid, report_id: Uuid) -> PortResult<bool>;

    async fn delete_reports_for_account(&self, account_id: Uuid) -> PortResult<u64>;
}

/// Salted one-way hashing of passwords.
pub trait CredentialHasher: Send + Sync {
    /// Produces a self-describing hash string with its own salt.
    fn hash_password(&self, password: &str) -> PortResult<String>;

    /// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is unreadable.
    fn verify_password(&self, password: &str, hashed_password: &str) -> PortResult<bool>;
}
