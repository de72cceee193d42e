// app/src/db/pg_catalog.rs

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use storefront::{ProductId, ProductLookup, ProductSnapshot};
use tracing::instrument;

use super::ProductRepository;
use crate::models::product::ProductRow;
use crate::models::{NewProduct, Product, ProductChanges};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, created_at, updated_at, deleted_at";

/// The `products` table, both as the order core's `ProductLookup` and as
/// the catalog CRUD repository.
#[derive(Clone)]
pub struct PgCatalog {
  pool: PgPool,
}

impl PgCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductLookup for PgCatalog {
  #[instrument(name = "pg_catalog::resolve_products", skip(self, ids), fields(requested = ids.len()), err)]
  async fn resolve_products(&self, ids: &BTreeSet<ProductId>) -> anyhow::Result<HashMap<ProductId, ProductSnapshot>> {
    let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products WHERE id = ANY($1) AND deleted_at IS NULL",
      PRODUCT_COLUMNS
    ))
    .bind(&raw_ids)
    .fetch_all(&self.pool)
    .await
    .context("batch product lookup")?;

    Ok(
      rows
        .into_iter()
        .map(|row| {
          let product = Product::from(row);
          (product.id, product.snapshot())
        })
        .collect(),
    )
  }
}

#[async_trait]
impl ProductRepository for PgCatalog {
  #[instrument(name = "pg_catalog::list", skip(self), err)]
  async fn list(&self) -> anyhow::Result<Vec<Product>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products WHERE deleted_at IS NULL ORDER BY id ASC",
      PRODUCT_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await
    .context("select products")?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  #[instrument(name = "pg_catalog::get", skip(self), err)]
  async fn get(&self, id: ProductId) -> anyhow::Result<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products WHERE id = $1 AND deleted_at IS NULL",
      PRODUCT_COLUMNS
    ))
    .bind(id.get())
    .fetch_optional(&self.pool)
    .await
    .context("select product")?;
    Ok(row.map(Product::from))
  }

  #[instrument(name = "pg_catalog::create", skip(self, product), fields(name = %product.name), err)]
  async fn create(&self, product: NewProduct) -> anyhow::Result<Product> {
    let row: ProductRow = sqlx::query_as(&format!(
      "INSERT INTO products (name, description, price, stock) VALUES ($1, $2, $3, $4) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.stock)
    .fetch_one(&self.pool)
    .await
    .context("insert product")?;
    Ok(row.into())
  }

  #[instrument(name = "pg_catalog::update", skip(self, changes), err)]
  async fn update(&self, id: ProductId, changes: ProductChanges) -> anyhow::Result<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!(
      "UPDATE products SET \
         name = COALESCE($2, name), \
         description = COALESCE($3, description), \
         price = COALESCE($4, price), \
         stock = COALESCE($5, stock), \
         updated_at = NOW() \
       WHERE id = $1 AND deleted_at IS NULL \
       RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(id.get())
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.price)
    .bind(changes.stock)
    .fetch_optional(&self.pool)
    .await
    .context("update product")?;
    Ok(row.map(Product::from))
  }

  #[instrument(name = "pg_catalog::soft_delete", skip(self), err)]
  async fn soft_delete(&self, id: ProductId) -> anyhow::Result<bool> {
    let result =
      sqlx::query("UPDATE products SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id.get())
        .execute(&self.pool)
        .await
        .context("soft delete product")?;
    Ok(result.rows_affected() == 1)
  }
}
