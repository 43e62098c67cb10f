//! Infrastructure layer: storage adapters for the auth and listing crates.

pub mod store;


pub use store::{InMemoryMessageStore, InMemoryRentalStore, InMemoryUserStore};
