// marketplace/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use orderflow::FlowError;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-keyed validation reasons, e.g. `{"total": ["can't be set directly"]}`.
///
/// Keys are kept sorted so responses and log lines are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, reason);
    errors
  }

  /// Appends a reason to a field, skipping exact duplicates.
  pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
    let reasons = self.0.entry(field.into()).or_default();
    let reason = reason.into();
    if !reasons.contains(&reason) {
      reasons.push(reason);
    }
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// `Ok(())` when nothing was recorded.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, reasons) in &self.0 {
      for reason in reasons {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{} {}", field, reason)?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication required")]
  Unauthenticated,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("Notification failed: {0}")]
  Notification(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {0}")]
  Workflow(#[from] FlowError),

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A pipeline returned Stopped where the caller needed Completed.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHalted,
}

impl From<ValidationErrors> for AppError {
  fn from(errors: ValidationErrors) -> Self {
    AppError::Validation(errors)
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::PipelineHalted => StatusCode::CONFLICT,
      AppError::Notification(_)
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Responding with client error");
    }
    let mut builder = HttpResponse::build(status);
    match self {
      AppError::Validation(errors) => builder.json(json!({ "errors": errors })),
      AppError::Unauthenticated => builder.json(json!({ "error": "Not authenticated" })),
      AppError::NotFound(m) => builder.json(json!({ "error": m })),
      AppError::PipelineHalted => builder.json(json!({ "error": "Process halted by business logic." })),
      // Internal detail stays in the log.
      AppError::Sqlx(_) => builder.json(json!({ "error": "Database operation failed" })),
      AppError::Notification(_) | AppError::Config(_) | AppError::Workflow(_) | AppError::Internal(_) => {
        builder.json(json!({ "error": "An internal error occurred" }))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
