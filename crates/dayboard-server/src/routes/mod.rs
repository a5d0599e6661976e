//! HTTP surface: routers per resource family and error-to-response mapping.

pub mod events;
pub mod tasks;

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use dayboard_core::{FieldViolation, ValidationError};

use crate::state::AppState;
use crate::store::StoreError;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(tasks::router())
        .merge(events::router())
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health - liveness probe
async fn health() -> StatusCode {
    StatusCode::OK
}

/// JSON body extractor that reports undeserializable bodies in the same
/// `{"error", "violations"}` shape as field validation, instead of axum's
/// plain-text 422.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let mut errors = ValidationError::new();
                errors.add("body", rejection.body_text());
                Err(ApiError::Validation(errors))
            }
        }
    }
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
}

/// Errors a handler can surface, each with a fixed status mapping.
pub enum ApiError {
    /// 400 with the full violation list.
    Validation(ValidationError),
    /// 404.
    NotFound(String),
    /// 500; details stay in the log, not the response.
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                let body = Json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    violations: Some(err.violations),
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(id) => {
                let body = Json(ErrorResponse {
                    error: format!("Not found: {}", id),
                    violations: None,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body = Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                    violations: None,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
