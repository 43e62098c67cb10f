use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use chatop_rentals::NewMessage;

use crate::app::dto::{MessageResponse, SendMessageRequest};
use crate::app::routes::common;
use crate::app::{errors, extract::ApiJson, services::AppServices};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new().route("/", post(send_message))
}

/// POST /api/messages - the sender must be the caller.
pub async fn send_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    ApiJson(body): ApiJson<SendMessageRequest>,
) -> Response {
    let sender = match common::acting_principal(&services, &identity).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if body.user_id != sender.id {
        return errors::json_error(StatusCode::FORBIDDEN, "cannot send messages on behalf of another user");
    }

    let message = match NewMessage::new(body.message, body.user_id, body.rental_id) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.messages.send(message).await {
        Ok(_) => Json(MessageResponse {
            message: "Message send with success",
        })
        .into_response(),
        Err(e) => errors::listing_error_to_response(e),
    }
}
