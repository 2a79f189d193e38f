//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use census_service::ServiceError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Service(#[from] ServiceError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Service(e) => match e {
        ServiceError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
        ServiceError::Invalid(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        ServiceError::Enrichment(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
        ServiceError::Get | ServiceError::Update | ServiceError::Delete => {
          (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        // Already logged with its cause by the service.
        ServiceError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage error".to_owned()),
      },
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

// ─── Extractor rejections ─────────────────────────────────────────────────────

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}
