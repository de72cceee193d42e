// core/src/workflow/place_order.rs

use crate::error::{OrderError, PipelineError};
use crate::model::{NewOrderLine, OrderStatus, ProductId};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::ports::{OrderStore, ProductLookup};
use crate::workflow::contexts::PlaceOrderCtxData;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

pub const PLACE_ORDER_PIPELINE: &str = "place_order";

/// Structural checks on the requested lines. Runs before any store access.
pub fn validate_order_lines(lines: &[NewOrderLine]) -> Result<(), OrderError> {
  if lines.is_empty() {
    return Err(OrderError::Validation(
      "An order must contain at least one product.".to_string(),
    ));
  }
  for (idx, line) in lines.iter().enumerate() {
    if !line.product_id.is_valid() {
      return Err(OrderError::Validation(format!(
        "products[{}]: product_id must be a positive integer, got {}.",
        idx, line.product_id
      )));
    }
    if line.quantity < 1 {
      return Err(OrderError::Validation(format!(
        "products[{}]: quantity must be at least 1, got {}.",
        idx, line.quantity
      )));
    }
  }
  Ok(())
}

pub(crate) fn build_place_order_pipeline(
  store: Arc<dyn OrderStore>,
  catalog: Arc<dyn ProductLookup>,
) -> Pipeline<PlaceOrderCtxData, OrderError> {
  let mut p = Pipeline::<PlaceOrderCtxData, OrderError>::new(
    PLACE_ORDER_PIPELINE,
    &[
      "validate_order_lines",
      "resolve_catalog_products",
      "persist_order_with_lines",
      "load_placed_order",
    ],
  );

  p.on_root("validate_order_lines", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let verdict = {
        let guard = ctx_data.read();
        validate_order_lines(&guard.requested_lines)
      };
      verdict?;
      Ok::<_, OrderError>(PipelineControl::Continue)
    })
  });

  // Any unknown id aborts the whole order; there are no partial orders.
  let lookup = catalog.clone();
  p.on_root("resolve_catalog_products", move |ctx_data: ContextData<PlaceOrderCtxData>| {
    let lookup = lookup.clone();
    Box::pin(async move {
      let requested: BTreeSet<ProductId> = {
        let guard = ctx_data.read();
        guard.requested_lines.iter().map(|l| l.product_id).collect()
      };

      let mut resolved = lookup
        .resolve_products(&requested)
        .await
        .map_err(OrderError::store("resolve_products"))?;
      resolved.retain(|id, _| requested.contains(id));

      if resolved.len() != requested.len() {
        let missing: Vec<ProductId> = requested.iter().filter(|id| !resolved.contains_key(id)).copied().collect();
        warn!(?missing, "Order references products missing from the catalog.");
        return Err(OrderError::ProductNotFound { missing });
      }

      ctx_data.write().resolved_products = resolved;
      Ok::<_, OrderError>(PipelineControl::Continue)
    })
  });

  let writer = store.clone();
  p.on_root("persist_order_with_lines", move |ctx_data: ContextData<PlaceOrderCtxData>| {
    let writer = writer.clone();
    Box::pin(async move {
      let (user_id, lines) = {
        let guard = ctx_data.read();
        (guard.user_id, guard.requested_lines.clone())
      };

      let order_id = writer
        .insert_order_with_lines(user_id, OrderStatus::Pending, &lines)
        .await
        .map_err(OrderError::store("insert_order_with_lines"))?;

      info!(%order_id, %user_id, line_count = lines.len(), "Order persisted with its lines.");
      ctx_data.write().order_id = Some(order_id);
      Ok::<_, OrderError>(PipelineControl::Continue)
    })
  });

  // Re-read rather than assemble in memory so store-applied defaults
  // (ids, timestamps) are reflected in the result.
  let reader = store;
  p.on_root("load_placed_order", move |ctx_data: ContextData<PlaceOrderCtxData>| {
    let reader = reader.clone();
    Box::pin(async move {
      let order_id = ctx_data.read().order_id.ok_or(PipelineError::MissingOutput {
        pipeline: PLACE_ORDER_PIPELINE,
        field: "order_id",
      })?;

      let order = reader
        .load_order(order_id)
        .await
        .map_err(OrderError::store("load_order"))?
        .ok_or_else(|| OrderError::Store {
          operation: "load_order",
          source: anyhow::anyhow!("order {} was not readable right after insertion", order_id),
        })?;

      ctx_data.write().placed_order = Some(order);
      Ok::<_, OrderError>(PipelineControl::Continue)
    })
  });

  p
}
