//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use api_lib::{
    adapters::{Argon2Hasher, DbAdapter},
    config::Config,
    web::state::AppState,
};
use health_reports_core::HealthMetrics;
use std::sync::Arc;

/// A migrated, private in-memory store.
pub async fn test_db() -> Arc<DbAdapter> {
    let db = DbAdapter::in_memory().await.unwrap();
    db.run_migrations().await.unwrap();
    Arc::new(db)
}

/// Minimum Argon2 cost so tests stay fast.
pub fn test_hasher() -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap())
}

pub fn test_config() -> Arc<Config> {
    let config = Config::from_lookup(|name| match name {
        "COOKIE_SECURE" => Some("false".to_string()),
        _ => None,
    })
    .unwrap();
    Arc::new(config)
}

pub async fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(test_db().await, test_hasher(), test_config()))
}

pub fn metrics(weight_kg: f64) -> HealthMetrics {
    HealthMetrics {
        height_cm: 170.0,
        weight_kg,
        sugar_mg_dl: 92.0,
        bp_systolic: 118,
        bp_diastolic: 78,
        hemoglobin_g_dl: Some(14.0),
        cholesterol_mg_dl: None,
    }
}
