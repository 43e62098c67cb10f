//! `chatop-rentals`: rental listings and the messages users send about them.
//!
//! Pure domain rules plus the storage traits they need; the stores themselves
//! live in `chatop-infra`.

pub mod message;
pub mod rental;
pub mod service;
pub mod store;

pub use message::{Message, NewMessage};
pub use rental::{NewRental, Rental, RentalPatch};
pub use service::{ListingError, MessageService, RentalService};
pub use store::{MessageStore, RentalStore};
