// app/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use storefront::UserId;

#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id: UserId,
  pub email: String,
  pub name: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
  pub id: i64,
  pub email: String,
  pub name: String,
  pub password_hash: String,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    Self {
      id: UserId(row.id),
      email: row.email,
      name: row.name,
      password_hash: row.password_hash,
      is_admin: row.is_admin,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

/// A validated registration, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email: String,
  pub name: String,
  pub password_hash: String,
  pub is_admin: bool,
}
