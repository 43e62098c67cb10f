//! Process configuration read from the environment at startup.
//!
//! Every value is validated here so a bad deployment fails before binding.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use chatop_auth::{
    AuthorizationPolicy, CredentialVerifier, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, PasswordError, PolicyError,
    SigningKey,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together")]
    PartialBootstrapAdmin,

    #[error("cannot read policy file {path}: {source}")]
    PolicyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Credentials of the ADMIN principal seeded at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub signing_key: SigningKey,
    pub token_ttl: Duration,
    pub passwords: CredentialVerifier,
    pub policy: Arc<AuthorizationPolicy>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    /// Defaults around an explicit key: built-in policy, default TTL and bcrypt cost.
    pub fn new(signing_key: SigningKey) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parse_bind_addr(DEFAULT_BIND_ADDR)?,
            signing_key,
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            passwords: CredentialVerifier::default(),
            policy: Arc::new(AuthorizationPolicy::builtin()?),
            bootstrap_admin: None,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let signing_key = match var("JWT_SECRET") {
            Some(secret) => SigningKey::from_bytes(secret.into_bytes()).map_err(|e| ConfigError::Invalid {
                var: "JWT_SECRET",
                reason: e.to_string(),
            })?,
            None => {
                tracing::warn!("JWT_SECRET not set; using a random key, tokens will not survive a restart");
                SigningKey::generate()
            }
        };

        let mut config = Self::new(signing_key)?;

        if let Some(addr) = var("BIND_ADDR") {
            config.bind_addr = parse_bind_addr(&addr)?;
        }

        if let Some(ttl) = var("JWT_TTL_SECS") {
            config.token_ttl = ttl
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| (1..=MAX_TOKEN_TTL_SECS).contains(secs))
                .and_then(Duration::try_seconds)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "JWT_TTL_SECS",
                    reason: format!("expected 1..={MAX_TOKEN_TTL_SECS} seconds, got '{ttl}'"),
                })?;
        }

        if let Some(cost) = var("BCRYPT_COST") {
            let cost = cost.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                var: "BCRYPT_COST",
                reason: e.to_string(),
            })?;
            config.passwords = CredentialVerifier::new(cost)?;
        }

        if let Some(path) = var("CHATOP_POLICY_FILE") {
            let path = PathBuf::from(path);
            let source = std::fs::read_to_string(&path).map_err(|source| ConfigError::PolicyFile {
                path: path.clone(),
                source,
            })?;
            config.policy = Arc::new(AuthorizationPolicy::from_toml_str(&source)?);
            tracing::info!(path = %path.display(), "loaded authorization policy");
        }

        config.bootstrap_admin = match (var("BOOTSTRAP_ADMIN_EMAIL"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                name: var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                password,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialBootstrapAdmin),
        };

        Ok(config)
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        var: "BIND_ADDR",
        reason: e.to_string(),
    })
}
