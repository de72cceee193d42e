// app/src/state.rs
use crate::config::AppConfig;
use crate::db::{ProductRepository, UserRepository};
use crate::services::TokenIssuer;
use std::sync::Arc;
use storefront::{OrderStore, OrderSummaryProjector, OrderWorkflow, ProductLookup};

#[derive(Clone)]
pub struct AppState {
  pub workflow: Arc<OrderWorkflow>,
  pub projector: Arc<OrderSummaryProjector>,
  pub products: Arc<dyn ProductRepository>,
  pub users: Arc<dyn UserRepository>,
  pub tokens: Arc<TokenIssuer>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the order core onto the given storage adapters.
  pub fn new(
    config: Arc<AppConfig>,
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn ProductLookup>,
    products: Arc<dyn ProductRepository>,
    users: Arc<dyn UserRepository>,
  ) -> Self {
    let tokens = TokenIssuer::new(&config.jwt_secret, chrono::Duration::hours(config.token_ttl_hours));
    Self {
      workflow: Arc::new(OrderWorkflow::new(orders.clone(), catalog.clone())),
      projector: Arc::new(OrderSummaryProjector::new(orders, catalog)),
      products,
      users,
      tokens: Arc::new(tokens),
      config,
    }
  }
}
