// app/src/test_support.rs

//! Handler-test fixtures: an `AppState` over in-memory stores with one
//! customer, one admin and two products already present.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, App};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use storefront::{MemoryStore, NewOrderLine, Order, OrderId, OrderStore, ProductId};

use crate::config::{AppConfig, LogFormat};
use crate::db::memory::{MemoryCatalog, MemoryUsers};
use crate::models::{NewProduct, NewUser, User};
use crate::services::auth_service::hash_password;
use crate::state::AppState;
use crate::web::build_app;

pub const TEST_PASSWORD: &str = "s3cret-pass";
pub const CUSTOMER_EMAIL: &str = "customer@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const WIDGET_ID: i64 = 1;
pub const GADGET_ID: i64 = 2;

// Argon2 is slow in debug builds; hash the shared password once.
static PASSWORD_HASH: Lazy<String> = Lazy::new(|| hash_password(TEST_PASSWORD).unwrap());

pub fn test_config(allow_admin_signup: bool) -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".into(),
    server_port: 0,
    database_url: "postgres://unused".into(),
    db_max_connections: 1,
    db_acquire_timeout: Duration::from_secs(1),
    jwt_secret: "test-secret".into(),
    token_ttl_hours: 1,
    run_migrations: false,
    allow_admin_signup,
    log_format: LogFormat::Pretty,
  }
}

pub struct TestContext {
  pub state: AppState,
  pub orders: Arc<MemoryStore>,
  pub customer: User,
  pub admin: User,
}

impl TestContext {
  pub fn new() -> Self {
    Self::build(false)
  }

  pub fn with_admin_signup() -> Self {
    Self::build(true)
  }

  fn build(allow_admin_signup: bool) -> Self {
    let orders = Arc::new(MemoryStore::new());
    let catalog = Arc::new(MemoryCatalog::default());
    let users = Arc::new(MemoryUsers::default());

    catalog.insert(NewProduct {
      name: "Widget".into(),
      description: "A widget".into(),
      price: 1000,
      stock: 10,
    });
    catalog.insert(NewProduct {
      name: "Gadget".into(),
      description: "A gadget".into(),
      price: 500,
      stock: 10,
    });

    let customer = seed_user(&users, CUSTOMER_EMAIL, false);
    let admin = seed_user(&users, ADMIN_EMAIL, true);

    let state = AppState::new(
      Arc::new(test_config(allow_admin_signup)),
      orders.clone(),
      catalog.clone(),
      catalog,
      users,
    );
    Self {
      state,
      orders,
      customer,
      admin,
    }
  }

  pub fn app(
    &self,
  ) -> App<
    impl ServiceFactory<
      ServiceRequest,
      Config = (),
      Response = ServiceResponse<impl MessageBody>,
      Error = actix_web::Error,
      InitError = (),
    >,
  > {
    build_app(self.state.clone())
  }

  pub fn customer_token(&self) -> String {
    self.state.tokens.issue(self.customer.id).unwrap()
  }

  pub fn admin_token(&self) -> String {
    self.state.tokens.issue(self.admin.id).unwrap()
  }

  pub fn as_customer(&self, req: test::TestRequest) -> actix_http::Request {
    with_token(req, &self.customer_token())
  }

  pub fn as_admin(&self, req: test::TestRequest) -> actix_http::Request {
    with_token(req, &self.admin_token())
  }

  /// Places a Widget x1 order for the customer directly through the workflow.
  pub async fn place_customer_order(&self) -> i64 {
    let order = self
      .state
      .workflow
      .place_order(
        self.customer.id,
        vec![NewOrderLine {
          product_id: ProductId(WIDGET_ID),
          quantity: 1,
        }],
      )
      .await
      .unwrap();
    order.id.get()
  }

  pub async fn load_order(&self, order_id: i64) -> Order {
    self.orders.load_order(OrderId(order_id)).await.unwrap().unwrap()
  }
}

fn seed_user(users: &MemoryUsers, email: &str, is_admin: bool) -> User {
  users
    .insert(NewUser {
      email: email.to_string(),
      name: email.split('@').next().unwrap_or(email).to_string(),
      password_hash: PASSWORD_HASH.clone(),
      is_admin,
    })
    .unwrap()
}

fn with_token(req: test::TestRequest, token: &str) -> actix_http::Request {
  req
    .insert_header(("Authorization", format!("Bearer {}", token)))
    .to_request()
}
