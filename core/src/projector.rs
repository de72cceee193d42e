// core/src/projector.rs

//! Order Summary Projector: the read-only listing view of a user's orders.

use crate::error::{OrderError, OrderResult};
use crate::model::{OrderId, OrderLine, OrderSummary, ProductId, ProductSnapshot, UserId};
use crate::ports::{OrderStore, ProductLookup};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct OrderSummaryProjector {
  store: Arc<dyn OrderStore>,
  catalog: Arc<dyn ProductLookup>,
}

impl OrderSummaryProjector {
  pub fn new(store: Arc<dyn OrderStore>, catalog: Arc<dyn ProductLookup>) -> Self {
    Self { store, catalog }
  }

  /// Lists the caller's orders, one row per (order, product, quantity).
  ///
  /// Returns `NoOrders` rather than an empty list when nothing matches.
  #[instrument(name = "projector::list_orders", skip(self), err(Display))]
  pub async fn list_orders(&self, user_id: UserId) -> OrderResult<Vec<OrderSummary>> {
    let lines = self
      .store
      .lines_for_user(user_id)
      .await
      .map_err(OrderError::store("lines_for_user"))?;
    if lines.is_empty() {
      return Err(OrderError::NoOrders);
    }

    let product_ids: BTreeSet<ProductId> = lines.iter().map(|l| l.product_id).collect();
    let products = self
      .catalog
      .resolve_products(&product_ids)
      .await
      .map_err(OrderError::store("resolve_products"))?;

    let rows = project_summaries(&lines, &products)?;
    debug!(line_count = lines.len(), row_count = rows.len(), "Order summaries projected.");
    if rows.is_empty() {
      return Err(OrderError::NoOrders);
    }
    Ok(rows)
  }
}

/// Joins lines with products and sums `quantity * price` per
/// (order, product, quantity) group. Lines whose product no longer resolves
/// are dropped. A total that does not fit in an `i64` is `TotalOverflow`.
pub fn project_summaries(
  lines: &[OrderLine],
  products: &HashMap<ProductId, ProductSnapshot>,
) -> OrderResult<Vec<OrderSummary>> {
  let mut groups: BTreeMap<(OrderId, ProductId, i32), i64> = BTreeMap::new();
  for line in lines {
    let Some(product) = products.get(&line.product_id) else {
      continue;
    };
    let overflow = || OrderError::TotalOverflow {
      order_id: line.order_id,
      product_id: line.product_id,
    };
    let line_total = i64::from(line.quantity).checked_mul(product.price).ok_or_else(overflow)?;
    let total = groups.entry((line.order_id, line.product_id, line.quantity)).or_insert(0);
    *total = total.checked_add(line_total).ok_or_else(overflow)?;
  }

  let rows = groups
    .into_iter()
    .filter_map(|((order_id, product_id, quantity), total_price)| {
      let product = products.get(&product_id)?;
      Some(OrderSummary {
        id: order_id,
        product_name: product.name.clone(),
        description: product.description.clone(),
        product_price: product.price,
        quantity: i64::from(quantity),
        total_price,
      })
    })
    .collect();
  Ok(rows)
}
