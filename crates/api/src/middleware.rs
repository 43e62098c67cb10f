//! Request authentication: turns an `Authorization: Bearer` header into an
//! [`IdentityContext`]. Never rejects; the policy layer decides what an
//! anonymous request may reach.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use chatop_auth::TokenVerifier;

use crate::context::IdentityContext;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn authenticate(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = extract_bearer(req.headers()) {
        match state.verifier.verify_at(token, Utc::now()) {
            Ok(claims) => {
                req.extensions_mut().insert(IdentityContext::from(claims));
            }
            Err(e) => {
                tracing::debug!(kind = e.kind(), path = %req.uri().path(), "bearer token rejected");
            }
        }
    }

    next.run(req).await
}

/// The token of a well-formed `Bearer <token>` header, if any.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum::http::header::AUTHORIZATION;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_well_formed_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers("Bearer  padded ")), Some("padded"));
    }

    #[test]
    fn anything_else_is_anonymous() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer(&headers("bearer abc")), None);
        assert_eq!(extract_bearer(&headers("Bearer ")), None);
        assert_eq!(extract_bearer(&headers("Bearer    ")), None);
    }
}
