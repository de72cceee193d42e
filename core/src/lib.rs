// core/src/lib.rs

//! Storefront order core.
//!
//! Owns the order side of the storefront service:
//!  - `workflow::OrderWorkflow`: place, cancel and re-status orders, each
//!    multi-step operation running as a named-step `pipeline::Pipeline`.
//!  - `projector::OrderSummaryProjector`: the per-user order listing.
//!  - `ports`: the storage capabilities the above are built on.
//!  - `memory::MemoryStore`: an in-process implementation of those ports.
//!
//! Nothing here knows about HTTP, authentication or a particular database.

pub mod error;
pub mod memory;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod projector;
pub mod workflow;

pub use crate::error::{OrderError, OrderResult, PipelineError};
pub use crate::memory::MemoryStore;
pub use crate::model::{
  NewOrderLine, Order, OrderId, OrderLine, OrderStatus, OrderSummary, ProductId, ProductSnapshot, UserId,
};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::ports::{OrderStore, ProductLookup};
pub use crate::projector::OrderSummaryProjector;
pub use crate::workflow::OrderWorkflow;
