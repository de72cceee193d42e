// app/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::auth_service::{self, LoginPayload, RegisterPayload};
use crate::state::AppState;
use crate::web::response;

#[derive(Deserialize, Debug, Default)]
pub struct RegisterQuery {
  #[serde(default)]
  pub admin: bool,
}

#[instrument(name = "handler::register", skip_all, fields(req_email = %payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  query: web::Query<RegisterQuery>,
  payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  let as_admin = query.admin && app_state.config.allow_admin_signup;
  if query.admin && !as_admin {
    warn!("Admin signup requested but disabled; registering a regular user.");
  }

  let user = auth_service::register(app_state.users.as_ref(), payload.into_inner(), as_admin).await?;
  info!(user_id = %user.id, is_admin = user.is_admin, "Signup successful.");
  Ok(response::created("User created successfully", user))
}

#[instrument(name = "handler::login", skip_all, fields(req_email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let token = auth_service::login(app_state.users.as_ref(), &app_state.tokens, payload.into_inner()).await?;
  Ok(response::ok("Login successful", json!({ "token": token })))
}
