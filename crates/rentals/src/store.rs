use std::sync::Arc;

use async_trait::async_trait;

use chatop_core::{RentalId, StoreResult};

use crate::{Message, NewMessage, NewRental, Rental};

#[async_trait]
pub trait RentalStore: Send + Sync {
    /// All listings, ordered by id.
    async fn list(&self) -> StoreResult<Vec<Rental>>;
    async fn get(&self, id: RentalId) -> StoreResult<Option<Rental>>;
    async fn insert(&self, rental: NewRental) -> StoreResult<Rental>;
    /// Replace a persisted listing (matched by id).
    async fn update(&self, rental: Rental) -> StoreResult<Rental>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, message: NewMessage) -> StoreResult<Message>;
    /// Messages about one listing, oldest first.
    async fn list_by_rental(&self, rental_id: RentalId) -> StoreResult<Vec<Message>>;
}

#[async_trait]
impl<S> RentalStore for Arc<S>
where
    S: RentalStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<Rental>> {
        (**self).list().await
    }

    async fn get(&self, id: RentalId) -> StoreResult<Option<Rental>> {
        (**self).get(id).await
    }

    async fn insert(&self, rental: NewRental) -> StoreResult<Rental> {
        (**self).insert(rental).await
    }

    async fn update(&self, rental: Rental) -> StoreResult<Rental> {
        (**self).update(rental).await
    }
}
