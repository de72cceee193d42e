// app/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod order_handlers;
pub mod product_handlers;

use crate::errors::AppError;

/// Path ids are store-generated and start at 1.
pub(crate) fn positive_id(raw: i64, what: &str) -> Result<i64, AppError> {
  if raw <= 0 {
    return Err(AppError::Validation(format!("{} id must be a positive integer.", what)));
  }
  Ok(raw)
}
