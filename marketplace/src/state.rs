// marketplace/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::auth_service::{Authenticator, TokenAuthenticator};
use crate::services::email_mock::Notifier;
use crate::store::Store;
use orderflow::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub store: Arc<dyn Store>,
  pub notifier: Arc<dyn Notifier>,
  pub authenticator: Arc<dyn Authenticator>,
  pub registry: Arc<Registry<AppError>>,
}

impl AppState {
  /// Wires the collaborators together and registers every pipeline.
  pub fn new(config: AppConfig, store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
    let registry = Registry::<AppError>::new();
    pipelines::register_all_pipelines(&registry);
    Self {
      config: Arc::new(config),
      authenticator: Arc::new(TokenAuthenticator::new(store.clone())),
      store,
      notifier,
      registry: Arc::new(registry),
    }
  }
}
