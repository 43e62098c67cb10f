//! Admin routes for principal management. The policy layer restricts `/api/admin/**` to ADMIN.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::put,
    Json, Router,
};

use chatop_auth::Role;
use chatop_core::UserId;

use crate::app::dto::ChangeRoleRequest;
use crate::app::routes::common;
use crate::app::{errors, extract::ApiJson, services::AppServices};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new().route("/users/:id/role", put(change_role))
}

/// PUT /api/admin/users/:id/role
pub async fn change_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ChangeRoleRequest>,
) -> Response {
    let id: UserId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let role: Role = match body.role.parse() {
        Ok(role) => role,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, format!("{e}")),
    };

    match services.auth.change_role(id, role).await {
        Ok(principal) => {
            tracing::info!(actor = identity.subject(), user_id = %id, role = %role, "role assigned by admin");
            Json(principal.profile()).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}
