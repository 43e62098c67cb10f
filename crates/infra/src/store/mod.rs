//! In-memory stores backing the API in dev/test deployments.
//!
//! Ids are assigned sequentially from 1. A poisoned lock surfaces as
//! `StoreError::Unavailable` instead of a panic.

mod messages;
mod rentals;
mod users;

pub use messages::InMemoryMessageStore;
pub use rentals::InMemoryRentalStore;
pub use users::InMemoryUserStore;

use chatop_core::StoreError;

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}
