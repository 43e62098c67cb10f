use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use chatop_auth::Registration;

use crate::app::routes::common;
use crate::app::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::app::{errors, extract::ApiJson, services::AppServices};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/me", get(me))
}

/// POST /api/auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Response {
    match services.auth.login(&body.email, &body.password).await {
        Ok(token) => Json(TokenResponse { token }).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// POST /api/auth/register - creates a USER and logs them in.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Response {
    let registration = Registration {
        email: body.email,
        name: body.name,
        password: body.password,
    };

    let token = match services.auth.register(registration).await {
        Ok(principal) => services.auth.issue_token(&principal),
        Err(e) => Err(e),
    };

    match token {
        Ok(token) => Json(TokenResponse { token }).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// GET /api/auth/me
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> Response {
    match common::acting_principal(&services, &identity).await {
        Ok(principal) => Json(principal.profile()).into_response(),
        Err(resp) => resp,
    }
}
