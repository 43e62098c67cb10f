//! `chatop-core`: identifiers and error types shared by every other crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod store;

pub use error::{DomainError, DomainResult};
pub use id::{MessageId, RentalId, UserId};
pub use store::{StoreError, StoreResult};
