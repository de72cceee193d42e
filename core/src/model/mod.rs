// core/src/model/mod.rs

//! Order-side data structures shared by the workflow, the projector and the
//! storage adapters.

pub mod ids;
pub mod order;
pub mod status;
pub mod summary;

pub use ids::{OrderId, ProductId, UserId};
pub use order::{NewOrderLine, Order, OrderLine, ProductSnapshot};
pub use status::{OrderStatus, UnknownOrderStatus};
pub use summary::OrderSummary;
