//! Bearer token minting and verification (HS256 JWS compact format).
//!
//! The codec is the only place that touches token bytes. It never exposes an
//! unverified decode: [`TokenCodec::verify_at`] checks the segment layout and the
//! algorithm, then the
//! MAC, then the typed claims, then the expiry window, in that order.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use thiserror::Error;

use crate::claims::{TokenClaims, VerifiedClaims, validate_claims};
use crate::Role;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token malformed: {0}")]
    Malformed(String),

    #[error("token signature invalid")]
    SignatureInvalid,

    #[error("token expired")]
    Expired,

    #[error("token subject must not be empty")]
    InvalidSubject,

    #[error("token lifetime must be between one second and one year")]
    InvalidTtl,

    #[error("signing key must not be empty")]
    EmptyKey,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short, stable label for logs. Never sent to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed(_) => "malformed",
            TokenError::SignatureInvalid => "signature_invalid",
            TokenError::Expired => "expired",
            TokenError::InvalidSubject => "invalid_subject",
            TokenError::InvalidTtl => "invalid_ttl",
            TokenError::EmptyKey => "empty_key",
            TokenError::Signing(_) => "signing",
        }
    }
}

/// Process-lifetime symmetric signing key.
///
/// Held in memory only. Replacing it invalidates every outstanding token.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Length of randomly generated keys (matches the HS512 block size).
    pub const GENERATED_LEN: usize = 64;

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TokenError::EmptyKey);
        }
        Ok(Self(bytes))
    }

    /// Fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; Self::GENERATED_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Verification seam consumed by the request authenticator.
pub trait TokenVerifier: Send + Sync {
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaims, TokenError>;
}

/// Mints and verifies HS256 bearer tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(key: &SigningKey, ttl: Duration) -> Result<Self, TokenError> {
        if ttl < Duration::seconds(1) || ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
            return Err(TokenError::InvalidTtl);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // Expiry is checked in `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims = ["exp", "sub"].into_iter().map(String::from).collect();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            header: Header::new(ALGORITHM),
            validation,
            ttl,
        })
    }

    pub fn with_default_ttl(key: &SigningKey) -> Result<Self, TokenError> {
        Self::new(key, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `subject` with `role`, issued now.
    pub fn mint(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.mint_at(subject, role, Utc::now())
    }

    /// Mint a token as if issued at `now`.
    pub fn mint_at(&self, subject: &str, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::InvalidSubject);
        }

        let expires_at = now.checked_add_signed(self.ttl).ok_or(TokenError::InvalidTtl)?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }
}

impl TokenVerifier for TokenCodec {
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaims, TokenError> {
        check_segments(token)?;
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?;
        validate_claims(&data.claims, now)
    }
}

/// Header and payload must decode; after that, anything wrong past the second
/// `.` is a bad signature, including stray dots or non-base64url bytes.
fn check_segments(token: &str) -> Result<(), TokenError> {
    let mut parts = token.splitn(3, '.');
    let (Some(header), Some(payload), Some(signature)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(TokenError::Malformed("expected header.payload.signature".to_string()));
    };

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::Malformed(format!("header: {e}")))?;
    serde_json::from_slice::<Header>(&header).map_err(|e| TokenError::Malformed(format!("header: {e}")))?;
    URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Malformed(format!("payload: {e}")))?;

    if signature.contains('.') || URL_SAFE_NO_PAD.decode(signature).is_err() {
        return Err(TokenError::SignatureInvalid);
    }
    Ok(())
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        // A header naming another algorithm cannot be verified with this key.
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
        _ => TokenError::Malformed(err.to_string()),
    }
}
