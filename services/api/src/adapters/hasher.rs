//! services/api/src/adapters/hasher.rs
//!
//! Argon2id implementation of the `CredentialHasher` port.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use health_reports_core::ports::{CredentialHasher, PortError, PortResult};

/// Hashes passwords into PHC strings with a fresh random salt each time.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2Hasher {
    /// Custom cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> PortResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| PortError::Unexpected(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {e}")))
    }

    fn verify_password(&self, password: &str, hashed_password: &str) -> PortResult<bool> {
        let parsed_hash = PasswordHash::new(hashed_password)
            .map_err(|e| PortError::Unexpected(format!("Failed to parse password hash: {e}")))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
