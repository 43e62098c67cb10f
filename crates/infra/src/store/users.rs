use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use chatop_auth::{NewPrincipal, Principal, Role, UserStore};
use chatop_core::{StoreError, StoreResult, UserId};

use super::poisoned;

#[derive(Debug, Default)]
struct UserTable {
    by_id: BTreeMap<UserId, Principal>,
    id_by_email: HashMap<String, UserId>,
    last_id: i64,
}

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Principal>> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table
            .id_by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<Principal>> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table.by_id.get(&id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table.id_by_email.contains_key(email))
    }

    async fn save(&self, principal: NewPrincipal) -> StoreResult<Principal> {
        let mut table = self.inner.write().map_err(poisoned)?;
        if table.id_by_email.contains_key(&principal.email) {
            return Err(StoreError::Conflict(format!("email {}", principal.email)));
        }

        table.last_id += 1;
        let id = UserId::from_raw(table.last_id);
        let now = Utc::now();
        let stored = Principal {
            id,
            email: principal.email,
            name: principal.name,
            password_hash: principal.password_hash,
            role: principal.role,
            created_at: now,
            updated_at: now,
        };

        table.id_by_email.insert(stored.email.clone(), id);
        table.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_role(&self, id: UserId, role: Role) -> StoreResult<Principal> {
        let mut table = self.inner.write().map_err(poisoned)?;
        let principal = table
            .by_id
            .get_mut(&id)
            .ok_or_else(|| StoreError::Missing(format!("user {id}")))?;
        principal.role = role;
        principal.updated_at = Utc::now();
        Ok(principal.clone())
    }
}
