use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use chatop_core::{MessageId, RentalId, StoreResult};
use chatop_rentals::{Message, MessageStore, NewMessage};

use super::poisoned;

/// In-memory message store for tests/dev. Append-only.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    inner: RwLock<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: NewMessage) -> StoreResult<Message> {
        let mut rows = self.inner.write().map_err(poisoned)?;
        let now = Utc::now();
        let stored = Message {
            id: MessageId::from_raw(rows.len() as i64 + 1),
            rental_id: message.rental_id,
            user_id: message.user_id,
            message: message.message,
            created_at: now,
            updated_at: now,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_rental(&self, rental_id: RentalId) -> StoreResult<Vec<Message>> {
        let rows = self.inner.read().map_err(poisoned)?;
        Ok(rows.iter().filter(|m| m.rental_id == rental_id).cloned().collect())
    }
}
