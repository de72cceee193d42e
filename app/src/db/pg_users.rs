// app/src/db/pg_users.rs

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use storefront::UserId;
use tracing::instrument;

use super::UserRepository;
use crate::models::user::UserRow;
use crate::models::{NewUser, User};

#[derive(Clone)]
pub struct PgUsers {
  pool: PgPool,
}

impl PgUsers {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for PgUsers {
  #[instrument(name = "pg_users::create", skip(self, user), fields(email = %user.email), err)]
  async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
      "INSERT INTO users (email, name, password_hash, is_admin) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (email) DO NOTHING \
       RETURNING id, email, name, password_hash, is_admin, created_at, updated_at",
    )
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(user.is_admin)
    .fetch_optional(&self.pool)
    .await
    .context("insert user")?;
    Ok(row.map(User::from))
  }

  #[instrument(name = "pg_users::find_by_email", skip(self), err)]
  async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
      "SELECT id, email, name, password_hash, is_admin, created_at, updated_at \
       FROM users WHERE email = $1 AND deleted_at IS NULL",
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await
    .context("select user by email")?;
    Ok(row.map(User::from))
  }

  #[instrument(name = "pg_users::find_by_id", skip(self), err)]
  async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
      "SELECT id, email, name, password_hash, is_admin, created_at, updated_at \
       FROM users WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id.get())
    .fetch_optional(&self.pool)
    .await
    .context("select user by id")?;
    Ok(row.map(User::from))
  }
}
