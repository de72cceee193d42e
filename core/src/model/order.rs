// core/src/model/order.rs

use super::{OrderId, OrderStatus, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order as persisted, with its lines materialized from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
  pub id: OrderId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
  pub user_id: UserId,
  pub status: OrderStatus,
  pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderLine {
  pub order_id: OrderId,
  pub product_id: ProductId,
  pub quantity: i32,
}

/// One requested line of a new order, before it is bound to an order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
  pub product_id: ProductId,
  pub quantity: i32,
}

/// Catalog view of a product at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSnapshot {
  pub id: ProductId,
  pub name: String,
  pub description: String,
  /// Minor currency units.
  pub price: i64,
}
