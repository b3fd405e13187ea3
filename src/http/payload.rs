//! Request body extraction for JSON and HTML form submissions.

use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use crate::http::response::ApiError;

/// Deserializes the body as a URL-encoded form when the content type says
/// so, and as JSON otherwise. Rejections keep axum's status: `400` for
/// malformed bodies, `413` over the body limit, `415` for other content types.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&request) {
            let Form(value) = Form::<T>::from_request(request, state)
                .await
                .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(request, state)
                .await
                .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
            Ok(Payload(value))
        }
    }
}
