// core/src/ports.rs

//! Storage capabilities the order core depends on. Adapters (PostgreSQL in the
//! server, `MemoryStore` in tests) implement these and are injected at
//! construction time.

use crate::model::{NewOrderLine, Order, OrderId, OrderLine, OrderStatus, ProductId, ProductSnapshot, UserId};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// Read-only catalog access used when an order is placed and when orders are
/// listed.
#[async_trait]
pub trait ProductLookup: Send + Sync {
  /// Resolves every id it can in one batch. Unknown or deleted products are
  /// absent from the returned map.
  async fn resolve_products(&self, ids: &BTreeSet<ProductId>) -> anyhow::Result<HashMap<ProductId, ProductSnapshot>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Inserts the order row and every line as one atomic unit. On error
  /// nothing is left behind.
  async fn insert_order_with_lines(
    &self,
    user_id: UserId,
    status: OrderStatus,
    lines: &[NewOrderLine],
  ) -> anyhow::Result<OrderId>;

  /// Loads a non-deleted order together with its lines.
  async fn load_order(&self, order_id: OrderId) -> anyhow::Result<Option<Order>>;

  /// `pending -> cancelled` as a single conditioned write. Returns whether a
  /// row matched (exists, owned by `user_id`, currently pending).
  async fn cancel_if_pending(&self, order_id: OrderId, user_id: UserId) -> anyhow::Result<bool>;

  /// Unconditional status write. Returns whether the order exists.
  async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> anyhow::Result<bool>;

  /// Every line of every non-deleted order owned by `user_id`.
  async fn lines_for_user(&self, user_id: UserId) -> anyhow::Result<Vec<OrderLine>>;
}
