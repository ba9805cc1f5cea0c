// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use storefront_core::{ActionResult, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Order Store Error: {0}")]
  Persistence(String),

  #[error("Messaging Bot Error: {0}")]
  Notification(String),

  #[error("Email Error: {0}")]
  Mail(String),

  #[error("Cache Revalidation Error: {0}")]
  Revalidation(String),

  #[error("Collaborator HTTP Error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{source}")]
  Core {
    #[from]
    source: CoreError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A flow handler returned Stop where the caller needed it to complete.
  #[error("Order flow was halted before completion.")]
  FlowHalted,
}

impl AppError {
  /// Message placed in the `error` field of a failed action result.
  pub fn public_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::Persistence(m)
      | AppError::Notification(m)
      | AppError::Mail(m)
      | AppError::Revalidation(m) => m.clone(),
      AppError::Sqlx(e) => e.to_string(),
      AppError::Core { source } => source.to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Http(_) => "Upstream service error".to_string(),
      AppError::Internal(_) => "An internal error occurred".to_string(),
      AppError::FlowHalted => self.to_string(),
    }
  }

  /// Wraps this error into the `{success:false,error}` result shape.
  pub fn to_action_result(&self) -> ActionResult {
    ActionResult::failed(self.public_message())
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<AppError>() {
      Ok(app_err) => app_err,
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) | AppError::FlowHalted => StatusCode::CONFLICT,
      AppError::Notification(_) | AppError::Mail(_) | AppError::Revalidation(_) | AppError::Http(_) => {
        StatusCode::BAD_GATEWAY
      }
      AppError::Core { source } => match source {
        CoreError::InvalidStatus(_) | CoreError::InvalidSource(_) => StatusCode::BAD_REQUEST,
        CoreError::IllegalTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Persistence(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }
    HttpResponse::build(status).json(self.to_action_result())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
