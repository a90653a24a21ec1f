// attire-server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use attire::Error as CoreError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication required: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Core(core) => match core {
        CoreError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
        CoreError::NotFound { .. } => {
          HttpResponse::NotFound().json(json!({"error": core.to_string()}))
        }
        CoreError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
        CoreError::Gateway { .. } => {
          HttpResponse::PaymentRequired().json(json!({"error": "Payment provider error"}))
        }
        CoreError::ObjectStore { .. } => {
          HttpResponse::InternalServerError().json(json!({"error": "Image storage failed"}))
        }
        CoreError::Persistence(_) => {
          HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
        }
      },
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
