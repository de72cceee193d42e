// core/src/workflow/mod.rs

//! The Order Workflow Engine: placement, owner cancellation and privileged
//! status updates.

pub mod contexts;
pub mod place_order;
pub mod update_status;

use crate::error::{OrderError, OrderResult, PipelineError};
use crate::model::{NewOrderLine, Order, OrderId, OrderStatus, UserId};
use crate::pipeline::{ContextData, Pipeline, PipelineResult};
use crate::ports::{OrderStore, ProductLookup};
use contexts::{PlaceOrderCtxData, UpdateStatusCtxData};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub use place_order::validate_order_lines;

pub struct OrderWorkflow {
  store: Arc<dyn OrderStore>,
  place_order_pipeline: Pipeline<PlaceOrderCtxData, OrderError>,
  update_status_pipeline: Pipeline<UpdateStatusCtxData, OrderError>,
}

impl OrderWorkflow {
  pub fn new(store: Arc<dyn OrderStore>, catalog: Arc<dyn ProductLookup>) -> Self {
    Self {
      place_order_pipeline: place_order::build_place_order_pipeline(store.clone(), catalog),
      update_status_pipeline: update_status::build_update_status_pipeline(store.clone()),
      store,
    }
  }

  /// Creates a `pending` order owned by `user_id` with one line per entry in
  /// `lines`, then returns it as re-read from the store.
  #[instrument(name = "workflow::place_order", skip(self, lines), fields(line_count = lines.len()), err(Display))]
  pub async fn place_order(&self, user_id: UserId, lines: Vec<NewOrderLine>) -> OrderResult<Order> {
    let ctx_data = ContextData::new(PlaceOrderCtxData::new(user_id, lines));

    match self.place_order_pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => {
        let order = ctx_data.into_inner().placed_order.ok_or(PipelineError::MissingOutput {
          pipeline: place_order::PLACE_ORDER_PIPELINE,
          field: "placed_order",
        })?;
        info!(order_id = %order.id, "Order placed.");
        Ok(order)
      }
      PipelineResult::Stopped => Err(OrderError::Halted(place_order::PLACE_ORDER_PIPELINE)),
    }
  }

  /// Owner-initiated `pending -> cancelled`. A missing order, a foreign order
  /// and a non-pending order all yield `NotEligible`.
  #[instrument(name = "workflow::cancel_order", skip(self), err(Display))]
  pub async fn cancel_order(&self, order_id: OrderId, user_id: UserId) -> OrderResult<()> {
    if !order_id.is_valid() {
      return Err(OrderError::Validation(format!(
        "Order id must be a positive integer, got {}.",
        order_id
      )));
    }

    let cancelled = self
      .store
      .cancel_if_pending(order_id, user_id)
      .await
      .map_err(OrderError::store("cancel_if_pending"))?;

    if !cancelled {
      warn!("Cancellation rejected.");
      return Err(OrderError::NotEligible);
    }
    info!("Order cancelled.");
    Ok(())
  }

  /// Sets `new_status` whatever the current status is. Admin rights are the
  /// caller's responsibility.
  #[instrument(name = "workflow::update_order_status", skip(self), fields(status = %new_status), err(Display))]
  pub async fn update_order_status(&self, order_id: OrderId, new_status: OrderStatus) -> OrderResult<Order> {
    if !order_id.is_valid() {
      return Err(OrderError::Validation(format!(
        "Order id must be a positive integer, got {}.",
        order_id
      )));
    }

    let ctx_data = ContextData::new(UpdateStatusCtxData::new(order_id, new_status));
    match self.update_status_pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => Ok(ctx_data.into_inner().updated_order.ok_or(PipelineError::MissingOutput {
        pipeline: update_status::UPDATE_STATUS_PIPELINE,
        field: "updated_order",
      })?),
      PipelineResult::Stopped => Err(OrderError::Halted(update_status::UPDATE_STATUS_PIPELINE)),
    }
  }
}
