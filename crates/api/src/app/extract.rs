//! Request body extraction with the API's error body on failure.

use axum::{
    async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;

use crate::app::errors::json_error;

/// `Json<T>` whose rejection (bad syntax, missing field, wrong content type)
/// is answered as `{"error": "..."}` with axum's status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_response(rejection)),
        }
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!(status = %rejection.status(), reason = %rejection.body_text(), "request body rejected");
    json_error(rejection.status(), rejection.body_text())
}
