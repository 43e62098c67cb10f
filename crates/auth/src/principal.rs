use chrono::{DateTime, Utc};
use serde::Serialize;

use chatop_core::UserId;

use crate::Role;

/// A registered user identity as held by the user store.
///
/// `id` and `email` never change after creation; `role` and `password_hash`
/// are the only mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// Public view of the principal (no password hash).
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A principal that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Serializable profile returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
