// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::Arc;
use storefront::{
  MemoryStore, NewOrderLine, Order, OrderSummaryProjector, OrderWorkflow, ProductId, ProductSnapshot, UserId,
};
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn product(id: i64, price: i64) -> ProductSnapshot {
  ProductSnapshot {
    id: ProductId(id),
    name: format!("Product {}", id),
    description: format!("Description of product {}", id),
    price,
  }
}

pub fn line(product_id: i64, quantity: i32) -> NewOrderLine {
  NewOrderLine {
    product_id: ProductId(product_id),
    quantity,
  }
}

/// `(product_id, quantity)` pairs, sorted, for multiset comparisons.
pub fn line_pairs(order: &Order) -> Vec<(ProductId, i32)> {
  let mut pairs: Vec<_> = order.lines.iter().map(|l| (l.product_id, l.quantity)).collect();
  pairs.sort();
  pairs
}

pub const ALICE: UserId = UserId(7);
pub const BOB: UserId = UserId(9);

/// A store seeded with products 3 (1000) and 5 (500), plus the workflow and
/// projector wired onto it.
pub struct Harness {
  pub store: Arc<MemoryStore>,
  pub workflow: OrderWorkflow,
  pub projector: OrderSummaryProjector,
}

impl Harness {
  pub fn new() -> Self {
    Self::with_products(vec![product(3, 1000), product(5, 500)])
  }

  pub fn with_products(products: Vec<ProductSnapshot>) -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::with_products(products));
    let workflow = OrderWorkflow::new(store.clone(), store.clone());
    let projector = OrderSummaryProjector::new(store.clone(), store.clone());
    Self {
      store,
      workflow,
      projector,
    }
  }
}
