// app/src/db/mod.rs

//! Persistence for the server: the PostgreSQL adapters behind the order
//! core's ports, plus the catalog and user repositories the handlers use.

pub mod pg_catalog;
pub mod pg_orders;
pub mod pg_users;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use storefront::{ProductId, UserId};

use crate::models::{NewProduct, NewUser, Product, ProductChanges, User};

pub use pg_catalog::PgCatalog;
pub use pg_orders::PgOrderStore;
pub use pg_users::PgUsers;

#[async_trait]
pub trait ProductRepository: Send + Sync {
  async fn list(&self) -> anyhow::Result<Vec<Product>>;

  async fn get(&self, id: ProductId) -> anyhow::Result<Option<Product>>;

  async fn create(&self, product: NewProduct) -> anyhow::Result<Product>;

  /// `None` when no live product has `id`.
  async fn update(&self, id: ProductId, changes: ProductChanges) -> anyhow::Result<Option<Product>>;

  /// Marks the product deleted. Returns whether a live product matched.
  async fn soft_delete(&self, id: ProductId) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
  /// `None` when the email is already registered.
  async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>>;

  async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

  async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;
}
