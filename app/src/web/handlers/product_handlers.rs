// app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::ProductId;
use tracing::{info, instrument, warn};

use super::positive_id;
use crate::errors::AppError;
use crate::models::{NewProduct, ProductChanges};
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};
use crate::web::response;

fn product_not_found(id: ProductId) -> AppError {
  warn!(product_id = %id, "Product not found.");
  AppError::NotFound("Product not found".to_string())
}

#[instrument(name = "handler::list_products", skip_all, fields(user_id = %user.user_id))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let products = app_state.products.list().await?;
  info!("Fetched {} products.", products.len());
  Ok(response::ok("Products retrieved successfully", products))
}

#[instrument(name = "handler::get_product", skip(app_state, _user))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let id = ProductId(positive_id(path.into_inner(), "Product")?);
  let product = app_state.products.get(id).await?.ok_or_else(|| product_not_found(id))?;
  Ok(response::ok("Product retrieved successfully", product))
}

#[instrument(name = "handler::create_product", skip_all, fields(admin_id = %admin.user_id, name = %payload.name))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let new_product = payload.into_inner();
  new_product.validate()?;

  let product = app_state.products.create(new_product).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(response::created("Product created successfully", product))
}

#[instrument(name = "handler::update_product", skip(app_state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<i64>,
  payload: web::Json<ProductChanges>,
) -> Result<HttpResponse, AppError> {
  let id = ProductId(positive_id(path.into_inner(), "Product")?);
  let changes = payload.into_inner();
  changes.validate()?;
  if changes.is_empty() {
    return Err(AppError::Validation("No fields to update.".to_string()));
  }

  let product = app_state
    .products
    .update(id, changes)
    .await?
    .ok_or_else(|| product_not_found(id))?;
  info!(product_id = %id, "Product updated.");
  Ok(response::ok("Product updated successfully", product))
}

#[instrument(name = "handler::delete_product", skip(app_state, admin), fields(admin_id = %admin.user_id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let id = ProductId(positive_id(path.into_inner(), "Product")?);
  if !app_state.products.soft_delete(id).await? {
    return Err(product_not_found(id));
  }
  info!(product_id = %id, "Product deleted.");
  Ok(response::ApiResponse::message_only(actix_web::http::StatusCode::OK, "Product deleted successfully").into_http())
}
