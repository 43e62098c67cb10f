//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores and use-case services
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: error → response mapping
//! - `extract.rs`: JSON body extractor with JSON rejections

use std::sync::Arc;

use anyhow::Context as _;
use axum::{Extension, Router};
use tower::ServiceBuilder;

use chatop_auth::TokenCodec;

use crate::authz::{self, PolicyState};
use crate::config::ApiConfig;
use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
///
/// Requests pass the authenticator first, then the route policy, then the handler.
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let codec = Arc::new(TokenCodec::new(&config.signing_key, config.token_ttl).context("invalid token settings")?);
    let services = Arc::new(services::build_services(config, codec.clone()).await?);

    let auth_state = AuthState { verifier: codec };
    let policy_state = PolicyState {
        policy: config.policy.clone(),
    };

    let layers = ServiceBuilder::new()
        .layer(axum::middleware::from_fn_with_state(auth_state, middleware::authenticate))
        .layer(axum::middleware::from_fn_with_state(policy_state, authz::authorize));

    tracing::info!(
        rules = config.policy.rules().count(),
        token_ttl_secs = config.token_ttl.num_seconds(),
        "application wired"
    );

    Ok(routes::router().layer(Extension(services)).layer(layers))
}
