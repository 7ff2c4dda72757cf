// marketplace/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)] // Never send the credential to a client
  pub auth_token: String,
  pub created_at: DateTime<Utc>,
}

/// Input for creating a user. The token is issued by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email: String,
  pub auth_token: String,
}

impl NewUser {
  /// Trimmed, lowercased email used for uniqueness checks and storage.
  pub fn normalized_email(&self) -> String {
    self.email.trim().to_lowercase()
  }
}
