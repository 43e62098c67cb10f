use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use chatop_core::RentalId;
use chatop_rentals::NewRental;

use crate::app::dto::{CreateRentalRequest, MessageResponse, MessagesResponse, RentalsResponse, UpdateRentalRequest};
use crate::app::routes::common;
use crate::app::{errors, extract::ApiJson, services::AppServices};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_rentals).post(create_rental))
        .route("/:id", get(get_rental).put(update_rental))
        .route("/:id/messages", get(list_messages))
}

/// GET /api/rentals
pub async fn list_rentals(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.rentals.list().await {
        Ok(rentals) => Json(RentalsResponse { rentals }).into_response(),
        Err(e) => errors::listing_error_to_response(e),
    }
}

/// GET /api/rentals/:id
pub async fn get_rental(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id: RentalId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.rentals.get(id).await {
        Ok(rental) => Json(rental).into_response(),
        Err(e) => errors::listing_error_to_response(e),
    }
}

/// POST /api/rentals - the caller becomes the owner.
pub async fn create_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    ApiJson(body): ApiJson<CreateRentalRequest>,
) -> Response {
    let owner = match common::acting_principal(&services, &identity).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let rental = NewRental {
        name: body.name,
        surface: body.surface,
        price: body.price,
        picture: body.picture,
        description: body.description,
        owner_id: owner.id,
    };

    match services.rentals.create(rental).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "Rental created !",
            }),
        )
            .into_response(),
        Err(e) => errors::listing_error_to_response(e),
    }
}

/// PUT /api/rentals/:id - owner only.
pub async fn update_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateRentalRequest>,
) -> Response {
    let id: RentalId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let actor = match common::acting_principal(&services, &identity).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.rentals.update(id, body.into(), actor.id).await {
        Ok(_) => Json(MessageResponse {
            message: "Rental updated !",
        })
        .into_response(),
        Err(e) => errors::listing_error_to_response(e),
    }
}

/// GET /api/rentals/:id/messages - owner only.
pub async fn list_messages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Response {
    let id: RentalId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let actor = match common::acting_principal(&services, &identity).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.messages.for_rental(id, actor.id).await {
        Ok(messages) => Json(MessagesResponse { messages }).into_response(),
        Err(e) => errors::listing_error_to_response(e),
    }
}
