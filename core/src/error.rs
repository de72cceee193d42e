// core/src/error.rs
use crate::model::{OrderId, ProductId};
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failures of the step runner itself, as opposed to failures of the work a
/// step performs.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Pipeline '{pipeline}' has no handler for step '{step_name}'")]
  HandlerMissing { pipeline: &'static str, step_name: String },

  #[error("Pipeline '{pipeline}' left '{field}' unset after completing")]
  MissingOutput { pipeline: &'static str, field: &'static str },
}

/// Every way an order operation can fail.
#[derive(Debug, Error)]
pub enum OrderError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("One or more products do not exist: {missing:?}")]
  ProductNotFound { missing: Vec<ProductId> },

  #[error("Order {0} not found")]
  OrderNotFound(OrderId),

  /// Deliberately covers "no such order", "not yours" and "not pending".
  #[error("Order is not eligible for cancellation")]
  NotEligible,

  #[error("No orders found")]
  NoOrders,

  #[error("Store operation '{operation}' failed: {source:#}")]
  Store {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("Total price for order {order_id}, product {product_id} does not fit in 64 bits")]
  TotalOverflow { order_id: OrderId, product_id: ProductId },

  #[error("Workflow error: {0}")]
  Pipeline(#[from] PipelineError),

  #[error("Workflow '{0}' was halted before completion")]
  Halted(&'static str),
}

impl OrderError {
  pub(crate) fn store(operation: &'static str) -> impl FnOnce(AnyhowError) -> OrderError {
    move |source| OrderError::Store { operation, source }
  }

  /// True for failures caused by the caller's input or by the state of the
  /// referenced records, false for infrastructure failures.
  pub fn is_client_error(&self) -> bool {
    matches!(
      self,
      OrderError::Validation(_)
        | OrderError::ProductNotFound { .. }
        | OrderError::OrderNotFound(_)
        | OrderError::NotEligible
        | OrderError::NoOrders
    )
  }
}

pub type OrderResult<T, E = OrderError> = std::result::Result<T, E>;
