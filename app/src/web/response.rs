// app/src/web/response.rs

//! The JSON envelope every endpoint answers with:
//! `{"status": <http code>, "message": <text>, "data": <payload?>, "error": <text?>}`.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub status: u16,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
    Self {
      status: status.as_u16(),
      message: message.into(),
      data: Some(data),
      error: None,
    }
  }

  pub fn into_http(self) -> HttpResponse {
    let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(self)
  }
}

impl ApiResponse<()> {
  pub fn message_only(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status: status.as_u16(),
      message: message.into(),
      data: None,
      error: None,
    }
  }

  pub fn failure(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
    Self {
      status: status.as_u16(),
      message: message.into(),
      data: None,
      error,
    }
  }
}

pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
  ApiResponse::success(StatusCode::OK, message, data).into_http()
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
  ApiResponse::success(StatusCode::CREATED, message, data).into_http()
}
