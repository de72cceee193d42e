// app/src/db/pg_orders.rs

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use storefront::{NewOrderLine, Order, OrderId, OrderLine, OrderStatus, OrderStore, ProductId, UserId};
use tracing::{debug, instrument};

#[derive(Debug, FromRow)]
struct OrderRow {
  id: i64,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  deleted_at: Option<DateTime<Utc>>,
  user_id: i64,
  status: String,
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
  order_id: i64,
  product_id: i64,
  quantity: i32,
}

impl From<OrderLineRow> for OrderLine {
  fn from(row: OrderLineRow) -> Self {
    OrderLine {
      order_id: OrderId(row.order_id),
      product_id: ProductId(row.product_id),
      quantity: row.quantity,
    }
  }
}

/// `OrderStore` over the `orders` and `order_lines` tables.
#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "pg_orders::insert_order_with_lines", skip(self, lines), fields(line_count = lines.len()), err)]
  async fn insert_order_with_lines(
    &self,
    user_id: UserId,
    status: OrderStatus,
    lines: &[NewOrderLine],
  ) -> anyhow::Result<OrderId> {
    let mut tx = self.pool.begin().await.context("begin order transaction")?;

    let order_id: i64 = sqlx::query_scalar("INSERT INTO orders (user_id, status) VALUES ($1, $2) RETURNING id")
      .bind(user_id.get())
      .bind(status.as_str())
      .fetch_one(&mut *tx)
      .await
      .context("insert into orders")?;

    for line in lines {
      sqlx::query("INSERT INTO order_lines (order_id, product_id, quantity) VALUES ($1, $2, $3)")
        .bind(order_id)
        .bind(line.product_id.get())
        .bind(line.quantity)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("insert into order_lines for product {}", line.product_id))?;
    }

    // Dropping `tx` on any early return above rolls the whole order back.
    tx.commit().await.context("commit order transaction")?;
    debug!(order_id, "Order row and lines committed.");
    Ok(OrderId(order_id))
  }

  #[instrument(name = "pg_orders::load_order", skip(self), err)]
  async fn load_order(&self, order_id: OrderId) -> anyhow::Result<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(
      "SELECT id, created_at, updated_at, deleted_at, user_id, status FROM orders WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(order_id.get())
    .fetch_optional(&self.pool)
    .await
    .context("select order")?;

    let Some(row) = row else {
      return Ok(None);
    };

    let lines: Vec<OrderLineRow> =
      sqlx::query_as("SELECT order_id, product_id, quantity FROM order_lines WHERE order_id = $1")
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .context("select order lines")?;

    let status = row
      .status
      .parse::<OrderStatus>()
      .map_err(|e| anyhow!("order {} has an unreadable status: {}", row.id, e))?;

    Ok(Some(Order {
      id: OrderId(row.id),
      created_at: row.created_at,
      updated_at: row.updated_at,
      deleted_at: row.deleted_at,
      user_id: UserId(row.user_id),
      status,
      lines: lines.into_iter().map(OrderLine::from).collect(),
    }))
  }

  #[instrument(name = "pg_orders::cancel_if_pending", skip(self), err)]
  async fn cancel_if_pending(&self, order_id: OrderId, user_id: UserId) -> anyhow::Result<bool> {
    let result = sqlx::query(
      "UPDATE orders SET status = $1, updated_at = NOW() \
       WHERE id = $2 AND user_id = $3 AND status = $4 AND deleted_at IS NULL",
    )
    .bind(OrderStatus::Cancelled.as_str())
    .bind(order_id.get())
    .bind(user_id.get())
    .bind(OrderStatus::Pending.as_str())
    .execute(&self.pool)
    .await
    .context("conditional cancel update")?;

    Ok(result.rows_affected() == 1)
  }

  #[instrument(name = "pg_orders::set_status", skip(self), err)]
  async fn set_status(&self, order_id: OrderId, status: OrderStatus) -> anyhow::Result<bool> {
    let result =
      sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND deleted_at IS NULL")
        .bind(status.as_str())
        .bind(order_id.get())
        .execute(&self.pool)
        .await
        .context("status update")?;

    Ok(result.rows_affected() == 1)
  }

  #[instrument(name = "pg_orders::lines_for_user", skip(self), err)]
  async fn lines_for_user(&self, user_id: UserId) -> anyhow::Result<Vec<OrderLine>> {
    let rows: Vec<OrderLineRow> = sqlx::query_as(
      "SELECT l.order_id, l.product_id, l.quantity \
       FROM order_lines l \
       JOIN orders o ON o.id = l.order_id \
       WHERE o.user_id = $1 AND o.deleted_at IS NULL \
       ORDER BY l.order_id, l.product_id, l.quantity",
    )
    .bind(user_id.get())
    .fetch_all(&self.pool)
    .await
    .context("select order lines for user")?;

    Ok(rows.into_iter().map(OrderLine::from).collect())
  }
}

// Run with `DATABASE_URL=postgres://... cargo test -p storefront_server -- --ignored`.
// Each test gets a fresh database with the migrations applied.
#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::PgCatalog;
  use std::collections::BTreeSet;
  use storefront::ProductLookup;

  async fn seed_user(pool: &PgPool, email: &str) -> UserId {
    let id: i64 =
      sqlx::query_scalar("INSERT INTO users (email, name, password_hash) VALUES ($1, 'test', 'x') RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
    UserId(id)
  }

  async fn seed_product(pool: &PgPool, name: &str, price: i64) -> ProductId {
    let id: i64 = sqlx::query_scalar("INSERT INTO products (name, price, stock) VALUES ($1, $2, 10) RETURNING id")
      .bind(name)
      .bind(price)
      .fetch_one(pool)
      .await
      .unwrap();
    ProductId(id)
  }

  async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
      .fetch_one(pool)
      .await
      .unwrap()
  }

  fn new_line(product_id: ProductId, quantity: i32) -> NewOrderLine {
    NewOrderLine { product_id, quantity }
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn insert_persists_order_and_all_lines(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let user = seed_user(&pool, "a@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;

    let order_id = store
      .insert_order_with_lines(user, OrderStatus::Pending, &[new_line(widget, 2), new_line(widget, 1)])
      .await
      .unwrap();

    let order = store.load_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.user_id, user);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.lines.len(), 2);
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn failing_line_insert_rolls_back_the_order_row(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let user = seed_user(&pool, "a@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;

    // The second line violates the products foreign key after the order
    // row and the first line are already written inside the transaction.
    let err = store
      .insert_order_with_lines(
        user,
        OrderStatus::Pending,
        &[new_line(widget, 1), new_line(ProductId(widget.get() + 1000), 1)],
      )
      .await
      .unwrap_err();

    assert!(format!("{:#}", err).contains("order_lines"));
    assert_eq!(count(&pool, "orders").await, 0);
    assert_eq!(count(&pool, "order_lines").await, 0);
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn quantity_check_rolls_back_the_order_row(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let user = seed_user(&pool, "a@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;

    let result = store
      .insert_order_with_lines(user, OrderStatus::Pending, &[new_line(widget, 1), new_line(widget, 0)])
      .await;

    assert!(result.is_err());
    assert_eq!(count(&pool, "orders").await, 0);
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn cancel_applies_once_and_only_for_the_owner(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;
    let order_id = store
      .insert_order_with_lines(alice, OrderStatus::Pending, &[new_line(widget, 1)])
      .await
      .unwrap();

    assert!(!store.cancel_if_pending(order_id, bob).await.unwrap());
    assert_eq!(store.load_order(order_id).await.unwrap().unwrap().status, OrderStatus::Pending);

    assert!(store.cancel_if_pending(order_id, alice).await.unwrap());
    assert!(!store.cancel_if_pending(order_id, alice).await.unwrap());
    assert_eq!(store.load_order(order_id).await.unwrap().unwrap().status, OrderStatus::Cancelled);
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn concurrent_cancels_succeed_exactly_once(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let alice = seed_user(&pool, "alice@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;
    let order_id = store
      .insert_order_with_lines(alice, OrderStatus::Pending, &[new_line(widget, 1)])
      .await
      .unwrap();

    let (first, second) = futures_util::join!(
      store.cancel_if_pending(order_id, alice),
      store.cancel_if_pending(order_id, alice)
    );

    assert_eq!([first.unwrap(), second.unwrap()].iter().filter(|applied| **applied).count(), 1);
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn soft_deleted_orders_are_invisible(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let alice = seed_user(&pool, "alice@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;
    let order_id = store
      .insert_order_with_lines(alice, OrderStatus::Pending, &[new_line(widget, 1)])
      .await
      .unwrap();
    sqlx::query("UPDATE orders SET deleted_at = NOW() WHERE id = $1")
      .bind(order_id.get())
      .execute(&pool)
      .await
      .unwrap();

    assert!(store.load_order(order_id).await.unwrap().is_none());
    assert!(!store.set_status(order_id, OrderStatus::Shipped).await.unwrap());
    assert!(!store.cancel_if_pending(order_id, alice).await.unwrap());
    assert!(store.lines_for_user(alice).await.unwrap().is_empty());
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn lines_for_user_returns_only_that_users_lines_in_order(pool: PgPool) {
    let store = PgOrderStore::new(pool.clone());
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;
    let widget = seed_product(&pool, "Widget", 1000).await;
    let gadget = seed_product(&pool, "Gadget", 500).await;
    let first = store
      .insert_order_with_lines(alice, OrderStatus::Pending, &[new_line(gadget, 1), new_line(widget, 2)])
      .await
      .unwrap();
    store
      .insert_order_with_lines(bob, OrderStatus::Pending, &[new_line(widget, 5)])
      .await
      .unwrap();
    let second = store
      .insert_order_with_lines(alice, OrderStatus::Pending, &[new_line(widget, 1)])
      .await
      .unwrap();

    let lines = store.lines_for_user(alice).await.unwrap();

    let keys: Vec<_> = lines.iter().map(|l| (l.order_id, l.product_id, l.quantity)).collect();
    assert_eq!(keys, vec![(first, widget, 2), (first, gadget, 1), (second, widget, 1)]);
  }

  #[sqlx::test(migrations = "./migrations")]
  #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
  async fn resolve_products_skips_unknown_and_deleted_ids(pool: PgPool) {
    let catalog = PgCatalog::new(pool.clone());
    let widget = seed_product(&pool, "Widget", 1000).await;
    let gadget = seed_product(&pool, "Gadget", 500).await;
    sqlx::query("UPDATE products SET deleted_at = NOW() WHERE id = $1")
      .bind(gadget.get())
      .execute(&pool)
      .await
      .unwrap();

    let ids = BTreeSet::from([widget, gadget, ProductId(gadget.get() + 1000)]);
    let found = catalog.resolve_products(&ids).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[&widget].name, "Widget");
    assert_eq!(found[&widget].price, 1000);
  }
}
