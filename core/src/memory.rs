// core/src/memory.rs

//! An in-process `OrderStore + ProductLookup`. It applies the same rules the
//! PostgreSQL schema does (quantity check, all-or-nothing order insert,
//! soft-deleted rows invisible) so workflow behaviour can be exercised
//! without a database.

use crate::model::{NewOrderLine, Order, OrderId, OrderLine, OrderStatus, ProductId, ProductSnapshot, UserId};
use crate::ports::{OrderStore, ProductLookup};
use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
struct OrderRow {
  user_id: UserId,
  status: OrderStatus,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Tables {
  last_order_id: i64,
  orders: BTreeMap<OrderId, OrderRow>,
  lines: Vec<OrderLine>,
  products: BTreeMap<ProductId, ProductSnapshot>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
  fail_line_inserts: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_products(products: impl IntoIterator<Item = ProductSnapshot>) -> Self {
    let store = Self::new();
    for product in products {
      store.upsert_product(product);
    }
    store
  }

  pub fn upsert_product(&self, product: ProductSnapshot) {
    self.tables.lock().products.insert(product.id, product);
  }

  pub fn remove_product(&self, product_id: ProductId) -> bool {
    self.tables.lock().products.remove(&product_id).is_some()
  }

  /// Makes the next order inserts fail at the line-insert stage, after the
  /// order row has been staged.
  #[cfg(any(test, feature = "test-utils"))]
  pub fn fail_line_inserts(&self, fail: bool) {
    self.fail_line_inserts.store(fail, Ordering::SeqCst);
  }

  pub fn order_count(&self) -> usize {
    self.tables.lock().orders.len()
  }

  pub fn line_count(&self) -> usize {
    self.tables.lock().lines.len()
  }

  pub fn soft_delete_order(&self, order_id: OrderId) -> bool {
    let mut tables = self.tables.lock();
    match tables.orders.get_mut(&order_id) {
      Some(row) if row.deleted_at.is_none() => {
        row.deleted_at = Some(Utc::now());
        true
      }
      _ => false,
    }
  }

  fn live_order(tables: &Tables, order_id: OrderId) -> Option<&OrderRow> {
    tables.orders.get(&order_id).filter(|row| row.deleted_at.is_none())
  }
}

#[async_trait]
impl ProductLookup for MemoryStore {
  async fn resolve_products(&self, ids: &BTreeSet<ProductId>) -> anyhow::Result<HashMap<ProductId, ProductSnapshot>> {
    let tables = self.tables.lock();
    Ok(
      ids
        .iter()
        .filter_map(|id| tables.products.get(id).map(|p| (*id, p.clone())))
        .collect(),
    )
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order_with_lines(
    &self,
    user_id: UserId,
    status: OrderStatus,
    lines: &[NewOrderLine],
  ) -> anyhow::Result<OrderId> {
    let mut tables = self.tables.lock();

    // Stage everything first; nothing becomes visible unless all of it is valid.
    let order_id = OrderId(tables.last_order_id + 1);
    let now = Utc::now();
    let staged_row = OrderRow {
      user_id,
      status,
      created_at: now,
      updated_at: now,
      deleted_at: None,
    };

    if self.fail_line_inserts.load(Ordering::SeqCst) {
      bail!("insert into order_lines failed for order {}; transaction rolled back", order_id);
    }
    let mut staged_lines = Vec::with_capacity(lines.len());
    for line in lines {
      if line.quantity < 1 {
        bail!("order_lines_quantity_check violated for product {}", line.product_id);
      }
      staged_lines.push(OrderLine {
        order_id,
        product_id: line.product_id,
        quantity: line.quantity,
      });
    }

    tables.last_order_id = order_id.get();
    tables.orders.insert(order_id, staged_row);
    tables.lines.extend(staged_lines);
    Ok(order_id)
  }

  async fn load_order(&self, order_id: OrderId) -> anyhow::Result<Option<Order>> {
    let tables = self.tables.lock();
    Ok(Self::live_order(&tables, order_id).map(|row| Order {
      id: order_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
      deleted_at: row.deleted_at,
      user_id: row.user_id,
      status: row.status,
      lines: tables.lines.iter().filter(|l| l.order_id == order_id).copied().collect(),
    }))
  }

  async fn cancel_if_pending(&self, order_id: OrderId, user_id: UserId) -> anyhow::Result<bool> {
    let mut tables = self.tables.lock();
    match tables.orders.get_mut(&order_id) {
      Some(row) if row.deleted_at.is_none() && row.user_id == user_id && row.status == OrderStatus::Pending => {
        row.status = OrderStatus::Cancelled;
        row.updated_at = Utc::now();
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> anyhow::Result<bool> {
    let mut tables = self.tables.lock();
    match tables.orders.get_mut(&order_id) {
      Some(row) if row.deleted_at.is_none() => {
        row.status = status;
        row.updated_at = Utc::now();
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn lines_for_user(&self, user_id: UserId) -> anyhow::Result<Vec<OrderLine>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .lines
        .iter()
        .filter(|l| Self::live_order(&tables, l.order_id).is_some_and(|row| row.user_id == user_id))
        .copied()
        .collect(),
    )
  }
}
