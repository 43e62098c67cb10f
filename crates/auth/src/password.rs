//! One-way password hashing (bcrypt).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Salted, adaptive password hashing with constant-time verification.
///
/// The produced string is a standard `$2b$<cost>$<salt><hash>` record, so the
/// salt and work factor travel with the hash.
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
}

impl CredentialVerifier {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(4..=31).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// `true` iff `plaintext` hashes to `stored`. A malformed stored hash is a non-match.
    pub fn matches(&self, plaintext: &str, stored: &str) -> bool {
        match bcrypt::verify(plaintext, stored) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::debug!(error = %e, "stored password hash is unreadable");
                false
            }
        }
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}
