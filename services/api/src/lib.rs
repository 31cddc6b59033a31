//! services/api/src/lib.rs
//!
//! The HTTP service around `health_reports_core`: configuration, adapters for
//! SQLite and Argon2, and the axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
