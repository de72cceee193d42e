// core/src/workflow/update_status.rs

use crate::error::OrderError;
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::ports::OrderStore;
use crate::workflow::contexts::UpdateStatusCtxData;
use std::sync::Arc;
use tracing::info;

pub const UPDATE_STATUS_PIPELINE: &str = "update_order_status";

/// Any status may move to any other, `cancelled` included. Callers that need
/// a stricter state machine must enforce it before reaching this pipeline.
pub(crate) fn build_update_status_pipeline(store: Arc<dyn OrderStore>) -> Pipeline<UpdateStatusCtxData, OrderError> {
  let mut p = Pipeline::<UpdateStatusCtxData, OrderError>::new(
    UPDATE_STATUS_PIPELINE,
    &["apply_order_status", "load_updated_order"],
  );

  let writer = store.clone();
  p.on_root("apply_order_status", move |ctx_data: ContextData<UpdateStatusCtxData>| {
    let writer = writer.clone();
    Box::pin(async move {
      let (order_id, new_status) = {
        let guard = ctx_data.read();
        (guard.order_id, guard.new_status)
      };

      let found = writer
        .set_status(order_id, new_status)
        .await
        .map_err(OrderError::store("set_status"))?;
      if !found {
        return Err(OrderError::OrderNotFound(order_id));
      }

      info!(%order_id, status = %new_status, "Order status written.");
      Ok::<_, OrderError>(PipelineControl::Continue)
    })
  });

  let reader = store;
  p.on_root("load_updated_order", move |ctx_data: ContextData<UpdateStatusCtxData>| {
    let reader = reader.clone();
    Box::pin(async move {
      let order_id = ctx_data.read().order_id;
      let order = reader
        .load_order(order_id)
        .await
        .map_err(OrderError::store("load_order"))?
        .ok_or(OrderError::OrderNotFound(order_id))?;

      ctx_data.write().updated_order = Some(order);
      Ok::<_, OrderError>(PipelineControl::Continue)
    })
  });

  p
}
