use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use chatop_core::UserId;

use crate::app::routes::common;
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new().route("/:id", get(get_user))
}

/// GET /api/user/:id
pub async fn get_user(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id: UserId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.auth.principal_by_id(id).await {
        Ok(principal) => Json(principal.profile()).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
