// app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use storefront::OrderError;
use thiserror::Error;

use crate::web::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error(transparent)]
  Order(#[from] OrderError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Adapter calls outside the order core return anyhow::Error with context
// attached; the whole chain is kept for the log line.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(format!("{:#}", err))
  }
}

impl AppError {
  /// Client-facing `message` and optional `error` detail. Server-side
  /// failures never expose their cause.
  fn public_parts(&self) -> (String, Option<String>) {
    match self {
      AppError::Validation(m) => ("Invalid input".to_string(), Some(m.clone())),
      AppError::Auth(m) => ("Unauthorized".to_string(), Some(m.clone())),
      AppError::Forbidden(m) => ("Forbidden".to_string(), Some(m.clone())),
      AppError::NotFound(m) | AppError::Conflict(m) => (m.clone(), None),
      AppError::Order(order_err) => match order_err {
        OrderError::Validation(m) => ("Invalid input".to_string(), Some(m.clone())),
        OrderError::ProductNotFound { missing } => (
          "One or more products do not exist".to_string(),
          Some(format!("Unknown product ids: {:?}", missing.iter().map(|id| id.get()).collect::<Vec<_>>())),
        ),
        OrderError::OrderNotFound(_) => ("Order not found".to_string(), None),
        OrderError::NotEligible => ("Order cannot be canceled".to_string(), None),
        OrderError::NoOrders => ("No orders found".to_string(), None),
        OrderError::Store { .. }
        | OrderError::TotalOverflow { .. }
        | OrderError::Pipeline(_)
        | OrderError::Halted(_) => ("An internal error occurred".to_string(), None),
      },
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => ("An internal error occurred".to_string(), None),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Order(order_err) if !order_err.is_client_error() => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Order(OrderError::Validation(_) | OrderError::NotEligible) => StatusCode::BAD_REQUEST,
      AppError::Order(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      match self {
        AppError::Order(OrderError::Store { operation, source }) => {
          tracing::error!(operation = *operation, error = ?source, "Order store failure.");
        }
        other => tracing::error!(application_error = %other, "Responding with server error."),
      }
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with client error.");
    }

    let (message, error) = self.public_parts();
    ApiResponse::failure(status, message, error).into_http()
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
