// app/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront::{ProductId, ProductSnapshot};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub description: String,
  /// Minor currency units.
  pub price: i64,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

/// Column layout of `products`.
#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: i64,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Self {
      id: ProductId(row.id),
      name: row.name,
      description: row.description,
      price: row.price,
      stock: row.stock,
      created_at: row.created_at,
      updated_at: row.updated_at,
      deleted_at: row.deleted_at,
    }
  }
}

impl Product {
  pub fn snapshot(&self) -> ProductSnapshot {
    ProductSnapshot {
      id: self.id,
      name: self.name.clone(),
      description: self.description.clone(),
      price: self.price,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: i64,
  #[serde(default)]
  pub stock: i32,
}

impl NewProduct {
  pub fn validate(&self) -> Result<(), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name is required.".to_string()));
    }
    check_price_and_stock(Some(self.price), Some(self.stock))
  }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<i64>,
  pub stock: Option<i32>,
}

impl ProductChanges {
  pub fn validate(&self) -> Result<(), AppError> {
    if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
      return Err(AppError::Validation("Product name cannot be blank.".to_string()));
    }
    check_price_and_stock(self.price, self.stock)
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.description.is_none() && self.price.is_none() && self.stock.is_none()
  }
}

fn check_price_and_stock(price: Option<i64>, stock: Option<i32>) -> Result<(), AppError> {
  if price.is_some_and(|p| p < 0) {
    return Err(AppError::Validation("Price cannot be negative.".to_string()));
  }
  if stock.is_some_and(|s| s < 0) {
    return Err(AppError::Validation("Stock cannot be negative.".to_string()));
  }
  Ok(())
}
