// marketplace/src/services/auth_service.rs

//! Authentication collaborator: maps an opaque request token to a user.

use crate::errors::Result as AppResult;
use crate::models::User;
use crate::store::Store;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// The authenticated identity of a request. Every service call that acts on
/// behalf of a user takes one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
  pub user_id: Uuid,
}

impl From<&User> for Principal {
  fn from(user: &User) -> Self {
    Self { user_id: user.id }
  }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
  /// `Ok(None)` when the token matches no user.
  async fn authenticate(&self, token: &str) -> AppResult<Option<User>>;
}

/// Looks tokens up in the store.
pub struct TokenAuthenticator {
  store: Arc<dyn Store>,
}

impl TokenAuthenticator {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
  #[instrument(name = "auth_service::authenticate", skip_all)]
  async fn authenticate(&self, token: &str) -> AppResult<Option<User>> {
    let user = self.store.find_user_by_token(token).await?;
    debug!(found = user.is_some(), "Token lookup finished.");
    Ok(user)
  }
}

/// Extracts the token from an `Authorization` header value. Accepts the raw
/// token as well as `Token <t>` and `Bearer <t>`.
pub fn token_from_header(value: &str) -> Option<&str> {
  let value = value.trim_start();
  let token = ["Token ", "Bearer "]
    .iter()
    .find_map(|prefix| value.strip_prefix(prefix))
    .unwrap_or(value)
    .trim();
  if token.is_empty() {
    None
  } else {
    Some(token)
  }
}

/// Issues a fresh opaque token.
pub fn generate_token() -> String {
  format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
