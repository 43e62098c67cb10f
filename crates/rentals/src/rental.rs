use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatop_core::{DomainError, DomainResult, RentalId, UserId};

/// Longest description a listing may carry.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// A property listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    pub name: String,
    pub surface: u32,
    pub price: u32,
    /// Picture URL; uploads are not handled by this service.
    pub picture: Option<String>,
    pub description: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    /// Only the owner may modify a listing.
    pub fn ensure_owned_by(&self, user_id: UserId) -> DomainResult<()> {
        if self.owner_id == user_id {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "user {user_id} is not the owner of rental {}",
                self.id
            )))
        }
    }
}

/// A listing that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRental {
    pub name: String,
    pub surface: u32,
    pub price: u32,
    pub picture: Option<String>,
    pub description: String,
    pub owner_id: UserId,
}

impl NewRental {
    /// Trim and validate the user-supplied fields.
    pub fn validated(mut self) -> DomainResult<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(DomainError::validation("rental name is required"));
        }
        check_description(&self.description)?;
        self.picture = normalize_picture(self.picture);
        Ok(self)
    }
}

/// Partial update; `None` leaves the field untouched. A blank `picture` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RentalPatch {
    pub name: Option<String>,
    pub surface: Option<u32>,
    pub price: Option<u32>,
    pub picture: Option<String>,
    pub description: Option<String>,
}

impl RentalPatch {
    pub fn apply(self, rental: &mut Rental, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("rental name must not be blank"));
            }
            rental.name = name.to_string();
        }
        if let Some(description) = self.description {
            check_description(&description)?;
            rental.description = description;
        }
        if let Some(surface) = self.surface {
            rental.surface = surface;
        }
        if let Some(price) = self.price {
            rental.price = price;
        }
        if let Some(picture) = self.picture {
            rental.picture = normalize_picture(Some(picture));
        }
        rental.updated_at = now;
        Ok(())
    }
}

fn check_description(description: &str) -> DomainResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation(format!(
            "description exceeds {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

fn normalize_picture(picture: Option<String>) -> Option<String> {
    picture
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}
