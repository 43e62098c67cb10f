use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatop_core::{DomainError, DomainResult, MessageId, RentalId, UserId};

pub const MAX_MESSAGE_LEN: usize = 2000;

/// A message a user sent about a rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub rental_id: RentalId,
    pub user_id: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub rental_id: RentalId,
    pub user_id: UserId,
    pub message: String,
}

impl NewMessage {
    pub fn new(message: impl Into<String>, user_id: UserId, rental_id: RentalId) -> DomainResult<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainError::validation("message content cannot be empty"));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(DomainError::validation(format!(
                "message exceeds {MAX_MESSAGE_LEN} characters"
            )));
        }
        Ok(Self {
            rental_id,
            user_id,
            message,
        })
    }
}
