// core/src/workflow/contexts.rs

//! State carried through the order pipelines. Handlers see these wrapped in
//! `ContextData`.

use crate::model::{NewOrderLine, Order, OrderId, OrderStatus, ProductId, ProductSnapshot, UserId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PlaceOrderCtxData {
  pub user_id: UserId,
  pub requested_lines: Vec<NewOrderLine>,
  pub resolved_products: HashMap<ProductId, ProductSnapshot>,
  pub order_id: Option<OrderId>,
  pub placed_order: Option<Order>,
}

impl PlaceOrderCtxData {
  pub fn new(user_id: UserId, requested_lines: Vec<NewOrderLine>) -> Self {
    Self {
      user_id,
      requested_lines,
      resolved_products: HashMap::new(),
      order_id: None,
      placed_order: None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct UpdateStatusCtxData {
  pub order_id: OrderId,
  pub new_status: OrderStatus,
  pub updated_order: Option<Order>,
}

impl UpdateStatusCtxData {
  pub fn new(order_id: OrderId, new_status: OrderStatus) -> Self {
    Self {
      order_id,
      new_status,
      updated_order: None,
    }
  }
}
