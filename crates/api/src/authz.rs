//! Route authorization: consults the [`AuthorizationPolicy`] with the identity
//! left by the authenticator, before any handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use chatop_auth::{AccessDenied, AuthorizationPolicy};

use crate::app::errors::json_error;
use crate::context::IdentityContext;

#[derive(Clone)]
pub struct PolicyState {
    pub policy: Arc<AuthorizationPolicy>,
}

pub async fn authorize(State(state): State<PolicyState>, req: Request, next: Next) -> Response {
    let role = req.extensions().get::<IdentityContext>().map(IdentityContext::role);

    match state.policy.authorize(req.method().as_str(), req.uri().path(), role) {
        Ok(()) => next.run(req).await,
        Err(denied) => {
            tracing::info!(method = %req.method(), path = %req.uri().path(), reason = %denied, "request denied");
            denial_response(&denied)
        }
    }
}

pub fn denial_response(denied: &AccessDenied) -> Response {
    match denied {
        AccessDenied::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "authentication required"),
        AccessDenied::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, "insufficient role"),
    }
}
