//! API error kinds and their HTTP rendering.
//!
//! Handlers return `Result<_, AppError>`. Lower-level failures are logged
//! where they happen and mapped to a generic `Internal` message so driver
//! text never reaches clients.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  InvalidInput(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  Internal(String),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub error: String,
}

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(status = status.as_u16(), error = %self, "request failed");
    } else {
      tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
    }
    (
      status,
      Json(ErrorBody {
        error: self.to_string(),
      }),
    )
      .into_response()
  }
}

/// Log `err` under `context` and replace it with a route-level message.
pub fn internal<E: std::fmt::Display>(
  context: &'static str,
  message: &'static str,
) -> impl FnOnce(E) -> AppError {
  move |err| {
    tracing::error!(error = %err, "{context}");
    AppError::Internal(message.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_map_to_statuses() {
    assert_eq!(
      AppError::InvalidInput("x".into()).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
    assert_eq!(
      AppError::Internal("x".into()).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn message_is_displayed_verbatim() {
    let e = AppError::NotFound("Application not found".into());
    assert_eq!(e.to_string(), "Application not found");
  }
}
