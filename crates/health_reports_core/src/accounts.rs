//! crates/health_reports_core/src/accounts.rs
//!
//! Registration, credential checks and session issuance.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Account, AuthSession};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::{CredentialHasher, DatabaseService, PortError};

/// The result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub account: Account,
    pub session: AuthSession,
}

pub struct AccountService {
    db: Arc<dyn DatabaseService>,
    hasher: Arc<dyn CredentialHasher>,
    session_ttl: Duration,
}

/// Usernames are trimmed and lower-cased before storage and lookup.
fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl AccountService {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        hasher: Arc<dyn CredentialHasher>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            db,
            hasher,
            session_ttl,
        }
    }

    /// Creates an account and logs it in.
    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<SignedIn> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(ServiceError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(ServiceError::MissingField("password"));
        }

        // Checked before the account exists, so a bad TTL leaves nothing behind.
        let expires_at = self.session_expiry()?;
        let hashed_password = self.hasher.hash_password(password)?;
        let account = self
            .db
            .create_account(&username, &hashed_password)
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => ServiceError::DuplicateUsername,
                other => ServiceError::Port(other),
            })?;
        info!("Registered account {} ({})", account.username, account.id);

        let session = self.issue_session(account.id, expires_at).await?;
        Ok(SignedIn { account, session })
    }

    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<SignedIn> {
        let username = normalize_username(username);
        let credentials = match self.db.get_account_by_username(&username).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => {
                warn!("Login attempt for unknown username");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self
            .hasher
            .verify_password(password, &credentials.hashed_password)?
        {
            warn!("Wrong password for account {}", credentials.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let session = self
            .issue_session(credentials.id, self.session_expiry()?)
            .await?;
        Ok(SignedIn {
            account: credentials.into_account(),
            session,
        })
    }

    /// Invalidates a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> ServiceResult<()> {
        self.db.delete_auth_session(token).await?;
        Ok(())
    }

    /// Returns the session behind `token` if it exists and has not expired.
    pub async fn resolve_session(&self, token: &str) -> ServiceResult<AuthSession> {
        let session = match self.db.get_auth_session(token).await {
            Ok(session) => session,
            Err(PortError::NotFound(_)) => return Err(ServiceError::Unauthenticated),
            Err(e) => return Err(e.into()),
        };
        if !session.is_active(Utc::now()) {
            return Err(ServiceError::Unauthenticated);
        }
        Ok(session)
    }

    pub async fn purge_expired_sessions(&self) -> ServiceResult<u64> {
        let removed = self.db.delete_expired_auth_sessions(Utc::now()).await?;
        if removed > 0 {
            info!("Purged {} expired sessions", removed);
        }
        Ok(removed)
    }

    fn session_expiry(&self) -> ServiceResult<DateTime<Utc>> {
        Utc::now()
            .checked_add_signed(self.session_ttl)
            .map(|expires_at| expires_at.trunc_subsecs(3))
            .ok_or_else(|| {
                PortError::Unexpected(format!(
                    "Session lifetime of {} hours is out of range",
                    self.session_ttl.num_hours()
                ))
                .into()
            })
    }

    async fn issue_session(
        &self,
        account_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> ServiceResult<AuthSession> {
        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            account_id,
            expires_at,
        };
        self.db.create_auth_session(&session).await?;
        Ok(session)
    }
}
