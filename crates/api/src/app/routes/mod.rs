use axum::{routing::get, Router};

pub mod admin;
pub mod auth;
pub mod common;
pub mod messages;
pub mod rentals;
pub mod system;
pub mod users;

/// Every route of the service. Access is decided by the policy layer, not here.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/api/auth", auth::router())
        .nest("/api/rentals", rentals::router())
        .nest("/api/messages", messages::router())
        .nest("/api/user", users::router())
        .nest("/api/admin", admin::router())
}
