// core/src/model/summary.rs

use super::OrderId;
use serde::Serialize;

/// One listing row per (order, product, quantity) group. Field names are part
/// of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
  pub id: OrderId,
  pub product_name: String,
  pub description: String,
  pub product_price: i64,
  pub quantity: i64,
  pub total_price: i64,
}
