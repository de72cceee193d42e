// app/src/web/extractors.rs

//! Request identity. `AuthenticatedUser` checks the bearer token;
//! `AdminUser` additionally looks the user up and requires `is_admin`.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use storefront::UserId;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: UserId,
}

#[derive(Debug, Clone, Copy)]
pub struct AdminUser {
  pub user_id: UserId,
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .cloned()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))
}

/// Accepts `Authorization: Bearer <token>` or the bare token.
fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
  let header = req
    .headers()
    .get(actix_web::http::header::AUTHORIZATION)
    .ok_or_else(|| AppError::Auth("Authorization header is required.".to_string()))?;
  let value = header
    .to_str()
    .map_err(|_| AppError::Auth("Authorization header is not valid text.".to_string()))?
    .trim();
  let token = value
    .strip_prefix("Bearer ")
    .or_else(|| value.strip_prefix("bearer "))
    .unwrap_or(value)
    .trim();
  if token.is_empty() {
    return Err(AppError::Auth("Authorization token is empty.".to_string()));
  }
  Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = app_state(req)?;
  let token = bearer_token(req)?;
  let user_id = state.tokens.verify(token).inspect_err(|e| {
    warn!(error = %e, path = %req.path(), "Rejected bearer token.");
  })?;
  Ok(AuthenticatedUser { user_id })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let checked = authenticate(req).and_then(|user| Ok((user, app_state(req)?)));
    Box::pin(async move {
      let (user, state) = checked?;
      let record = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User no longer exists.".to_string()))?;
      if !record.is_admin {
        warn!(user_id = %user.user_id, "Admin route refused for non-admin user.");
        return Err(AppError::Forbidden("Admin privileges are required.".to_string()));
      }
      Ok(AdminUser { user_id: user.user_id })
    })
  }
}
