// app/src/web/handlers/order_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use storefront::{NewOrderLine, OrderId, OrderStatus};
use tracing::{info, instrument};

use super::positive_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};
use crate::web::response::{self, ApiResponse};

#[derive(Deserialize, Debug)]
pub struct PlaceOrderPayload {
  pub products: Vec<NewOrderLine>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: String,
}

#[instrument(
  name = "handler::place_order",
  skip_all,
  fields(user_id = %user.user_id, line_count = payload.products.len())
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  payload: web::Json<PlaceOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let order = app_state
    .workflow
    .place_order(user.user_id, payload.into_inner().products)
    .await?;
  info!(order_id = %order.id, "Order placed via API.");
  Ok(response::created("Order placed successfully", order))
}

#[instrument(name = "handler::list_orders", skip_all, fields(user_id = %user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let summaries = app_state.projector.list_orders(user.user_id).await?;
  Ok(response::ok("Orders retrieved successfully", summaries))
}

#[instrument(name = "handler::cancel_order", skip(app_state, user), fields(user_id = %user.user_id))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = OrderId(positive_id(path.into_inner(), "Order")?);
  app_state.workflow.cancel_order(order_id, user.user_id).await?;
  Ok(ApiResponse::message_only(StatusCode::OK, "Order canceled successfully").into_http())
}

#[instrument(name = "handler::update_order_status", skip(app_state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<i64>,
  payload: web::Json<UpdateStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = OrderId(positive_id(path.into_inner(), "Order")?);
  let status = payload
    .status
    .parse::<OrderStatus>()
    .map_err(|e| AppError::Validation(e.to_string()))?;

  let order = app_state.workflow.update_order_status(order_id, status).await?;
  Ok(response::ok("Order status updated successfully", order))
}
