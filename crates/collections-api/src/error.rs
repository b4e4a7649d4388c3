//! Domain-error to HTTP translation.
//!
//! Every failure leaving a handler becomes a JSON:API error document:
//!
//! ```json
//! {"errors": [{"status": "404", "detail": "collection not found: ..."}]}
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use collections_core::CollectionError;
use serde::Serialize;

/// Wrapper carrying a domain error out of a handler.
#[derive(Debug, Clone)]
pub struct ApiFailure(pub CollectionError);

impl From<CollectionError> for ApiFailure {
    fn from(err: CollectionError) -> Self {
        ApiFailure(err)
    }
}

/// One member of the JSON:API `errors` array.
#[derive(Debug, Serialize)]
struct ErrorObject {
    status: String,
    detail: String,
}

#[derive(Debug, Serialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

/// HTTP status for a domain error.
fn status_of(err: &CollectionError) -> StatusCode {
    match err {
        CollectionError::NotFound { .. } => StatusCode::NOT_FOUND,
        CollectionError::Forbidden { .. } => StatusCode::FORBIDDEN,
        CollectionError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CollectionError::Validation { conflict, .. } => {
            if *conflict {
                StatusCode::CONFLICT
            } else {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        tracing::debug!(status = %status, error = %self.0, "request failed");
        let body = ErrorDocument {
            errors: vec![ErrorObject {
                status: status.as_u16().to_string(),
                detail: self.0.to_string(),
            }],
        };
        (status, Json(body)).into_response()
    }
}
