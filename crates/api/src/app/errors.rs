//! Domain/auth error → HTTP response translation. Every failure body is `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatop_auth::AuthError;
use chatop_core::DomainError;
use chatop_rentals::ListingError;

pub const INVALID_LOGIN: &str = "invalid email or password";
const INTERNAL: &str = "internal server error";

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Anything the client cannot act on. Details go to the log only.
pub fn internal_error(err: &dyn std::error::Error) -> Response {
    tracing::error!(error = %err, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
}

pub fn auth_error_to_response(err: AuthError) -> Response {
    match err {
        // Same status and body for both so the response does not reveal which emails exist.
        AuthError::PrincipalNotFound | AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, INVALID_LOGIN)
        }
        AuthError::DuplicateEmail(_) => json_error(StatusCode::CONFLICT, err.to_string()),
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        AuthError::UnknownUser(_) => json_error(StatusCode::NOT_FOUND, err.to_string()),
        AuthError::Token(_) | AuthError::Password(_) | AuthError::Store(_) => internal_error(&err),
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, err.to_string()),
    }
}

pub fn listing_error_to_response(err: ListingError) -> Response {
    match err {
        ListingError::Domain(e) => domain_error_to_response(e),
        ListingError::Store(e) => internal_error(&e),
    }
}
