use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use chatop_core::{RentalId, StoreError, StoreResult};
use chatop_rentals::{NewRental, Rental, RentalStore};

use super::poisoned;

#[derive(Debug, Default)]
struct RentalTable {
    rows: BTreeMap<RentalId, Rental>,
    last_id: i64,
}

/// In-memory rental store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRentalStore {
    inner: RwLock<RentalTable>,
}

impl InMemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RentalStore for InMemoryRentalStore {
    async fn list(&self) -> StoreResult<Vec<Rental>> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: RentalId) -> StoreResult<Option<Rental>> {
        let table = self.inner.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, rental: NewRental) -> StoreResult<Rental> {
        let mut table = self.inner.write().map_err(poisoned)?;
        table.last_id += 1;
        let id = RentalId::from_raw(table.last_id);
        let now = Utc::now();
        let stored = Rental {
            id,
            name: rental.name,
            surface: rental.surface,
            price: rental.price,
            picture: rental.picture,
            description: rental.description,
            owner_id: rental.owner_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, rental: Rental) -> StoreResult<Rental> {
        let mut table = self.inner.write().map_err(poisoned)?;
        let slot = table
            .rows
            .get_mut(&rental.id)
            .ok_or_else(|| StoreError::Missing(format!("rental {}", rental.id)))?;
        *slot = rental.clone();
        Ok(rental)
    }
}
