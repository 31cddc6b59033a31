//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use health_reports_core::ports::{CredentialHasher, DatabaseService};
use health_reports_core::{AccountService, ReportService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub accounts: Arc<AccountService>,
    pub reports: Arc<ReportService>,
}

impl AppState {
    /// Wires both services onto the same store.
    pub fn new(
        db: Arc<dyn DatabaseService>,
        hasher: Arc<dyn CredentialHasher>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                db.clone(),
                hasher,
                config.session_ttl(),
            )),
            reports: Arc::new(ReportService::new(db)),
            config,
        }
    }
}
