// app/src/db/memory.rs

//! In-process catalog and user directory for handler tests. Orders use the
//! core's `storefront::MemoryStore`.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use storefront::{ProductId, ProductLookup, ProductSnapshot, UserId};

use super::{ProductRepository, UserRepository};
use crate::models::{NewProduct, NewUser, Product, ProductChanges, User};

#[derive(Default)]
pub struct MemoryCatalog {
  products: Mutex<BTreeMap<ProductId, Product>>,
}

impl MemoryCatalog {
  pub fn insert(&self, product: NewProduct) -> Product {
    let mut products = self.products.lock();
    let now = Utc::now();
    let created = Product {
      id: ProductId(products.keys().next_back().map_or(1, |id| id.get() + 1)),
      name: product.name,
      description: product.description,
      price: product.price,
      stock: product.stock,
      created_at: now,
      updated_at: now,
      deleted_at: None,
    };
    products.insert(created.id, created.clone());
    created
  }
}

#[async_trait]
impl ProductLookup for MemoryCatalog {
  async fn resolve_products(&self, ids: &BTreeSet<ProductId>) -> anyhow::Result<HashMap<ProductId, ProductSnapshot>> {
    let products = self.products.lock();
    Ok(
      ids
        .iter()
        .filter_map(|id| products.get(id))
        .filter(|p| p.deleted_at.is_none())
        .map(|p| (p.id, p.snapshot()))
        .collect(),
    )
  }
}

#[async_trait]
impl ProductRepository for MemoryCatalog {
  async fn list(&self) -> anyhow::Result<Vec<Product>> {
    Ok(self.products.lock().values().filter(|p| p.deleted_at.is_none()).cloned().collect())
  }

  async fn get(&self, id: ProductId) -> anyhow::Result<Option<Product>> {
    Ok(self.products.lock().get(&id).filter(|p| p.deleted_at.is_none()).cloned())
  }

  async fn create(&self, product: NewProduct) -> anyhow::Result<Product> {
    Ok(self.insert(product))
  }

  async fn update(&self, id: ProductId, changes: ProductChanges) -> anyhow::Result<Option<Product>> {
    let mut products = self.products.lock();
    let Some(product) = products.get_mut(&id).filter(|p| p.deleted_at.is_none()) else {
      return Ok(None);
    };
    if let Some(name) = changes.name {
      product.name = name;
    }
    if let Some(description) = changes.description {
      product.description = description;
    }
    if let Some(price) = changes.price {
      product.price = price;
    }
    if let Some(stock) = changes.stock {
      product.stock = stock;
    }
    product.updated_at = Utc::now();
    Ok(Some(product.clone()))
  }

  async fn soft_delete(&self, id: ProductId) -> anyhow::Result<bool> {
    let mut products = self.products.lock();
    match products.get_mut(&id) {
      Some(product) if product.deleted_at.is_none() => {
        product.deleted_at = Some(Utc::now());
        Ok(true)
      }
      _ => Ok(false),
    }
  }
}

#[derive(Default)]
pub struct MemoryUsers {
  users: Mutex<Vec<User>>,
}

impl MemoryUsers {
  /// `None` when the email is taken.
  pub fn insert(&self, user: NewUser) -> Option<User> {
    let mut users = self.users.lock();
    if users.iter().any(|u| u.email == user.email) {
      return None;
    }
    let now = Utc::now();
    let created = User {
      id: UserId(users.len() as i64 + 1),
      email: user.email,
      name: user.name,
      password_hash: user.password_hash,
      is_admin: user.is_admin,
      created_at: now,
      updated_at: now,
    };
    users.push(created.clone());
    Some(created)
  }
}

#[async_trait]
impl UserRepository for MemoryUsers {
  async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>> {
    Ok(self.insert(user))
  }

  async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
    Ok(self.users.lock().iter().find(|u| u.email == email).cloned())
  }

  async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
    Ok(self.users.lock().iter().find(|u| u.id == id).cloned())
  }
}
