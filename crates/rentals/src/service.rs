//! Listing and messaging use cases.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use chatop_core::{DomainError, RentalId, StoreError, UserId};

use crate::{Message, MessageStore, NewMessage, NewRental, Rental, RentalPatch, RentalStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct RentalService {
    rentals: Arc<dyn RentalStore>,
}

impl RentalService {
    pub fn new(rentals: Arc<dyn RentalStore>) -> Self {
        Self { rentals }
    }

    pub async fn list(&self) -> Result<Vec<Rental>, ListingError> {
        Ok(self.rentals.list().await?)
    }

    pub async fn get(&self, id: RentalId) -> Result<Rental, ListingError> {
        self.rentals
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("rental {id}")).into())
    }

    pub async fn create(&self, rental: NewRental) -> Result<Rental, ListingError> {
        let rental = self.rentals.insert(rental.validated()?).await?;
        tracing::info!(rental_id = %rental.id, owner_id = %rental.owner_id, "rental created");
        Ok(rental)
    }

    /// Apply `patch` on behalf of `acting_user`, who must own the listing.
    pub async fn update(&self, id: RentalId, patch: RentalPatch, acting_user: UserId) -> Result<Rental, ListingError> {
        let mut rental = self.get(id).await?;
        rental.ensure_owned_by(acting_user)?;
        patch.apply(&mut rental, Utc::now())?;

        let rental = self.rentals.update(rental).await.map_err(|e| match e {
            StoreError::Missing(_) => ListingError::Domain(DomainError::not_found(format!("rental {id}"))),
            other => ListingError::Store(other),
        })?;
        tracing::info!(rental_id = %rental.id, "rental updated");
        Ok(rental)
    }
}

pub struct MessageService {
    messages: Arc<dyn MessageStore>,
    rentals: Arc<dyn RentalStore>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageStore>, rentals: Arc<dyn RentalStore>) -> Self {
        Self { messages, rentals }
    }

    /// Store a message about an existing rental.
    pub async fn send(&self, message: NewMessage) -> Result<Message, ListingError> {
        if self.rentals.get(message.rental_id).await?.is_none() {
            return Err(DomainError::not_found(format!("rental {}", message.rental_id)).into());
        }
        let message = self.messages.insert(message).await?;
        tracing::info!(message_id = %message.id, rental_id = %message.rental_id, "message stored");
        Ok(message)
    }

    /// Messages about a rental; only its owner may read them.
    pub async fn for_rental(&self, rental_id: RentalId, requester: UserId) -> Result<Vec<Message>, ListingError> {
        let rental = self
            .rentals
            .get(rental_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("rental {rental_id}")))?;
        rental.ensure_owned_by(requester)?;
        Ok(self.messages.list_by_rental(rental_id).await?)
    }
}
