// app/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};

use crate::errors::AppError;
use crate::state::AppState;

pub use routes::configure_app_routes;

/// The application without transport middleware. `main` adds request
/// tracing on top; tests drive it directly.
pub fn build_app(
  app_state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  // Body and path decoding failures answer with the same envelope as every
  // other client error.
  let json_config =
    web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into());
  let path_config =
    web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into());
  let query_config =
    web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into());

  App::new()
    .app_data(web::Data::new(app_state))
    .app_data(json_config)
    .app_data(path_config)
    .app_data(query_config)
    .configure(configure_app_routes)
}
