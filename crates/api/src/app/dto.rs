use serde::{Deserialize, Serialize};

use chatop_core::{RentalId, UserId};
use chatop_rentals::{Message, Rental, RentalPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRentalRequest {
    pub name: String,
    pub surface: u32,
    pub price: u32,
    pub picture: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRentalRequest {
    pub name: Option<String>,
    pub surface: Option<u32>,
    pub price: Option<u32>,
    pub picture: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateRentalRequest> for RentalPatch {
    fn from(req: UpdateRentalRequest) -> Self {
        RentalPatch {
            name: req.name,
            surface: req.surface,
            price: req.price,
            picture: req.picture,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub user_id: UserId,
    pub rental_id: RentalId,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RentalsResponse {
    pub rentals: Vec<Rental>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}
