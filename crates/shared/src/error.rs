use std::{
  backtrace::{Backtrace, BacktraceStatus},
  fmt::Display,
};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
  err: anyhow::Error,
  status_code: StatusCode,
}

impl AppError {
  /// Create with 500 status
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self {
      err: err.into(),
      status_code: StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Create with custom status
  pub fn with_status<E: Into<anyhow::Error>>(status: StatusCode, err: E) -> Self {
    Self {
      err: err.into(),
      status_code: status,
    }
  }

  pub fn bad_request(message: impl Display) -> Self {
    Self::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!("{message}"))
  }

  pub fn not_found(message: impl Display) -> Self {
    Self::with_status(StatusCode::NOT_FOUND, anyhow::anyhow!("{message}"))
  }

  #[must_use]
  pub const fn status_code(&self) -> StatusCode {
    self.status_code
  }

  /// Get backtrace from anyhow (requires `RUST_BACKTRACE=1` to capture)
  pub fn backtrace(&self) -> &Backtrace {
    self.err.backtrace()
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    if self.status_code.is_server_error() {
      tracing::error!(status = %self.status_code, "{:#}", self.err);
    } else {
      tracing::debug!(status = %self.status_code, "{}", self.err);
    }

    let bt = self.err.backtrace();
    let body = if cfg!(debug_assertions) && bt.status() == BacktraceStatus::Captured {
      json!({ "error": self.err.to_string(), "backtrace": bt.to_string() })
    } else {
      json!({ "error": self.err.to_string() })
    };
    (self.status_code, Json(body)).into_response()
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}", self.status_code, self.err)
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_includes_status() {
    let err = AppError::bad_request("Message cannot be empty");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "[400 Bad Request] Message cannot be empty");
  }

  #[test]
  fn foreign_errors_default_to_500() {
    let parse_err = "x".parse::<u32>().unwrap_err();
    let err = AppError::from(parse_err);
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
