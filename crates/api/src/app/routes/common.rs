use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::Response;

use chatop_auth::{AuthError, Principal};
use chatop_core::DomainError;

use crate::app::{errors, services::AppServices};
use crate::context::IdentityContext;

/// Resolve the token subject to its stored principal.
///
/// A subject with no principal behind it is treated as an unauthenticated request.
pub async fn acting_principal(services: &AppServices, identity: &IdentityContext) -> Result<Principal, Response> {
    match services.auth.current_principal(identity.subject()).await {
        Ok(principal) => Ok(principal),
        Err(AuthError::PrincipalNotFound) => {
            tracing::info!("token subject has no principal");
            Err(errors::json_error(StatusCode::UNAUTHORIZED, "authentication required"))
        }
        Err(e) => Err(errors::auth_error_to_response(e)),
    }
}

/// Parse a numeric path id into its typed form.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}
