//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use health_reports_core::domain::{
    Account, AccountCredentials, AuthSession, Classification, HealthMetrics, Report,
};
use health_reports_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// A private in-memory database. A single connection that is never
    /// recycled, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn from_millis(ms: i64) -> PortResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| PortError::Unexpected(format!("Stored timestamp {ms} is out of range")))
}

fn parse_label<T>(label: &str) -> PortResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    label
        .parse::<T>()
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AccountRecord {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: i64,
}
impl AccountRecord {
    fn to_domain(self) -> PortResult<AccountCredentials> {
        Ok(AccountCredentials {
            id: self.id,
            username: self.username,
            hashed_password: self.password_hash,
            created_at: from_millis(self.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    token: String,
    account_id: Uuid,
    expires_at: i64,
}
impl AuthSessionRecord {
    fn to_domain(self) -> PortResult<AuthSession> {
        Ok(AuthSession {
            token: self.token,
            account_id: self.account_id,
            expires_at: from_millis(self.expires_at)?,
        })
    }
}

#[derive(FromRow)]
struct ReportRecord {
    id: Uuid,
    account_id: Uuid,
    created_at: i64,
    height_cm: f64,
    weight_kg: f64,
    sugar_mg_dl: f64,
    bp_systolic: i32,
    bp_diastolic: i32,
    hemoglobin_g_dl: Option<f64>,
    cholesterol_mg_dl: Option<f64>,
    bmi: f64,
    bmi_category: String,
    sugar_category: String,
    bp_category: String,
    hemoglobin_category: Option<String>,
    cholesterol_category: Option<String>,
    overall: String,
}
impl ReportRecord {
    fn to_domain(self) -> PortResult<Report> {
        Ok(Report {
            id: self.id,
            account_id: self.account_id,
            metrics: HealthMetrics {
                height_cm: self.height_cm,
                weight_kg: self.weight_kg,
                sugar_mg_dl: self.sugar_mg_dl,
                bp_systolic: self.bp_systolic,
                bp_diastolic: self.bp_diastolic,
                hemoglobin_g_dl: self.hemoglobin_g_dl,
                cholesterol_mg_dl: self.cholesterol_mg_dl,
            },
            classification: Classification {
                bmi: self.bmi,
                bmi_category: parse_label(&self.bmi_category)?,
                sugar_category: parse_label(&self.sugar_category)?,
                bp_category: parse_label(&self.bp_category)?,
                hemoglobin_category: self
                    .hemoglobin_category
                    .as_deref()
                    .map(parse_label)
                    .transpose()?,
                cholesterol_category: self
                    .cholesterol_category
                    .as_deref()
                    .map(parse_label)
                    .transpose()?,
                overall: parse_label(&self.overall)?,
            },
            created_at: from_millis(self.created_at)?,
        })
    }
}

const REPORT_COLUMNS: &str = "id, account_id, created_at, height_cm, weight_kg, sugar_mg_dl, \
     bp_systolic, bp_diastolic, hemoglobin_g_dl, cholesterol_mg_dl, bmi, bmi_category, \
     sugar_category, bp_category, hemoglobin_category, cholesterol_category, overall";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_account(&self, username: &str, hashed_password: &str) -> PortResult<Account> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(hashed_password)
        .bind(created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PortError::Conflict(format!("Username {username} already exists"))
            }
            other => unexpected(other),
        })?;

        // Round-trip through millis so the returned value matches what is stored.
        Ok(Account {
            id,
            username: username.to_string(),
            created_at: from_millis(created_at.timestamp_millis())?,
        })
    }

    async fn get_account_by_username(&self, username: &str) -> PortResult<AccountCredentials> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, username, password_hash, created_at FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Account {} not found", username)),
            _ => unexpected(e),
        })?;
        record.to_domain()
    }

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (token, account_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(session.account_id)
            .bind(session.expires_at.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn get_auth_session(&self, token: &str) -> PortResult<AuthSession> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT token, account_id, expires_at FROM auth_sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound("Session not found".to_string()),
            _ => unexpected(e),
        })?;
        record.to_domain()
    }

    async fn delete_auth_session(&self, token: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn delete_expired_auth_sessions(&self, now: DateTime<Utc>) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= ?")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }

    async fn insert_report(&self, report: &Report) -> PortResult<()> {
        let m = &report.metrics;
        let c = &report.classification;
        sqlx::query(&format!(
            "INSERT INTO reports ({REPORT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(report.id)
        .bind(report.account_id)
        .bind(report.created_at.timestamp_millis())
        .bind(m.height_cm)
        .bind(m.weight_kg)
        .bind(m.sugar_mg_dl)
        .bind(m.bp_systolic)
        .bind(m.bp_diastolic)
        .bind(m.hemoglobin_g_dl)
        .bind(m.cholesterol_mg_dl)
        .bind(c.bmi)
        .bind(c.bmi_category.as_str())
        .bind(c.sugar_category.as_str())
        .bind(c.bp_category.as_str())
        .bind(c.hemoglobin_category.map(|l| l.as_str()))
        .bind(c.cholesterol_category.map(|l| l.as_str()))
        .bind(c.overall.as_str())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_reports_for_account(&self, account_id: Uuid) -> PortResult<Vec<Report>> {
        let records = sqlx::query_as::<_, ReportRecord>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE account_id = ? \
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn delete_report(&self, account_id: Uuid, report_id: Uuid) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ? AND account_id = ?")
            .bind(report_id)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_reports_for_account(&self, account_id: Uuid) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM reports WHERE account_id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}
