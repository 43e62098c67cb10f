//! `chatop-auth`: bearer-token authentication and route authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: the user store
//! is a trait, and the route policy works on plain method/path strings.

pub mod claims;
pub mod codec;
pub mod password;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod service;

pub use claims::{TokenClaims, VerifiedClaims, validate_claims};
pub use codec::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, SigningKey, TokenCodec, TokenError, TokenVerifier};
pub use password::{CredentialVerifier, PasswordError};
pub use policy::{AccessDenied, AuthorizationPolicy, AuthorizationRule, PolicyError};
pub use principal::{NewPrincipal, Principal, Profile};
pub use roles::{Role, UnknownRole};
pub use service::{AuthError, AuthenticationService, Registration, UserStore};
