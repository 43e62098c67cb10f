//! Login and registration orchestration.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use chatop_core::{StoreError, StoreResult, UserId};

use crate::{CredentialVerifier, NewPrincipal, PasswordError, Principal, Role, TokenCodec, TokenError};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("static email pattern compiles")
});

/// Principal lookup and persistence, owned by the user store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Principal>>;
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<Principal>>;
    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;
    /// Persist a new principal; the store assigns `id` and timestamps.
    async fn save(&self, principal: NewPrincipal) -> StoreResult<Principal>;
    async fn update_role(&self, id: UserId, role: Role) -> StoreResult<Principal>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Principal>> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<Principal>> {
        (**self).find_by_id(id).await
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        (**self).exists_by_email(email).await
    }

    async fn save(&self, principal: NewPrincipal) -> StoreResult<Principal> {
        (**self).save(principal).await
    }

    async fn update_role(&self, id: UserId, role: Role) -> StoreResult<Principal> {
        (**self).update_role(id, role).await
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no principal with that email")]
    PrincipalNotFound,

    #[error("password does not match")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    Validation(String),

    #[error("user {0} not found")]
    UnknownUser(UserId),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration input after transport decoding.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
}

pub struct AuthenticationService {
    users: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
    passwords: CredentialVerifier,
    // Compared against when the email is unknown so both login failures cost one bcrypt run.
    decoy_hash: String,
}

impl AuthenticationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        codec: Arc<TokenCodec>,
        passwords: CredentialVerifier,
    ) -> Result<Self, AuthError> {
        let decoy_hash = passwords.hash("decoy-password-never-matches")?;
        Ok(Self {
            users,
            codec,
            passwords,
            decoy_hash,
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Check credentials and mint a token for the principal.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = email.trim();
        let Some(principal) = self.users.find_by_email(email).await? else {
            let _ = self.passwords.matches(password, &self.decoy_hash);
            tracing::info!("login rejected: unknown email");
            return Err(AuthError::PrincipalNotFound);
        };

        if !self.passwords.matches(password, &principal.password_hash) {
            tracing::info!(user_id = %principal.id, "login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&principal)?;
        tracing::info!(user_id = %principal.id, role = %principal.role, "login succeeded");
        Ok(token)
    }

    /// Validate, enforce email uniqueness, hash the password and persist as `USER`.
    pub async fn register(&self, registration: Registration) -> Result<Principal, AuthError> {
        self.register_with_role(registration, Role::User).await
    }

    /// Same as [`Self::register`] with an explicit role (bootstrap admin seeding).
    pub async fn register_with_role(&self, registration: Registration, role: Role) -> Result<Principal, AuthError> {
        let email = registration.email.trim().to_string();
        let name = registration.name.trim().to_string();
        let password = registration.password.as_str();

        if email.is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(AuthError::Validation(format!("invalid email format: {email}")));
        }
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".to_string()));
        }
        if password.trim().is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        if self.users.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail(email));
        }

        let password_hash = self.passwords.hash(password)?;
        let principal = self
            .users
            .save(NewPrincipal {
                email: email.clone(),
                name,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration of the same email.
                StoreError::Conflict(_) => AuthError::DuplicateEmail(email),
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %principal.id, role = %principal.role, "principal registered");
        Ok(principal)
    }

    pub fn issue_token(&self, principal: &Principal) -> Result<String, AuthError> {
        Ok(self.codec.mint(&principal.email, principal.role)?)
    }

    /// Resolve the subject of a verified token back to its principal.
    pub async fn current_principal(&self, subject: &str) -> Result<Principal, AuthError> {
        self.users
            .find_by_email(subject)
            .await?
            .ok_or(AuthError::PrincipalNotFound)
    }

    pub async fn principal_by_id(&self, id: UserId) -> Result<Principal, AuthError> {
        self.users.find_by_id(id).await?.ok_or(AuthError::UnknownUser(id))
    }

    /// Promote or demote a principal. Tokens already issued keep their old role.
    pub async fn change_role(&self, id: UserId, role: Role) -> Result<Principal, AuthError> {
        let principal = self.users.update_role(id, role).await.map_err(|e| match e {
            StoreError::Missing(_) => AuthError::UnknownUser(id),
            other => AuthError::Store(other),
        })?;
        tracing::info!(user_id = %id, role = %role, "role changed");
        Ok(principal)
    }
}
