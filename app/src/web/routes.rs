// app/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::web::handlers::{auth_handlers, order_handlers, product_handlers};

async fn liveness_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "message": "Connected!" }))
}

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/", web::get().to(liveness_handler))
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::place_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}/cancel", web::put().to(order_handlers::cancel_order_handler))
          .route("/{order_id}/status", web::put().to(order_handlers::update_order_status_handler)),
      ),
  );
}

#[cfg(test)]
mod tests {
  use crate::test_support::TestContext;
  use actix_web::test;
  use serde_json::Value;

  #[actix_rt::test]
  async fn liveness_and_health_need_no_token() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/").to_request()).await;
    assert_eq!(body["message"], "Connected!");

    let body: Value =
      test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
    assert_eq!(body["status"], "ok");
  }
}
