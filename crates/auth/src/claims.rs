use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, TokenError};

/// JWT claim set carried by every bearer token.
///
/// This is a fixed, typed structure: a payload that does not deserialize into
/// it (missing claim, unknown role) is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the principal's email.
    pub sub: String,

    /// Role granted when the token was issued.
    pub role: Role,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

/// Claims of a token whose signature and expiry have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Deterministically validate the time window of already-authenticated claims.
///
/// A token is live iff `now < exp`; the instant `exp` itself is expired. There
/// is no leeway and no not-before check.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<VerifiedClaims, TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::Malformed("expiry precedes issue time".to_string()));
    }
    let issued_at = DateTime::from_timestamp(claims.iat, 0)
        .ok_or_else(|| TokenError::Malformed("iat out of range".to_string()))?;
    let expires_at = DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| TokenError::Malformed("exp out of range".to_string()))?;

    if now >= expires_at {
        return Err(TokenError::Expired);
    }

    Ok(VerifiedClaims {
        subject: claims.sub.clone(),
        role: claims.role,
        issued_at,
        expires_at,
    })
}
