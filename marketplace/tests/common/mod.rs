// tests/common/mod.rs
#![allow(dead_code)]

use marketplace_api::config::AppConfig;
use marketplace_api::models::{Product, User};
use marketplace_api::services::auth_service::Principal;
use marketplace_api::services::catalog_service;
use marketplace_api::services::email_mock::MockMailer;
use marketplace_api::state::AppState;
use marketplace_api::store::MemoryStore;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// App state over a fresh in-memory store, with handles to the concrete collaborators.
pub struct TestApp {
  pub state: AppState,
  pub store: Arc<MemoryStore>,
  pub mailer: Arc<MockMailer>,
}

/// P1 = 100.00 and P2 = 85.00, both sold by `seller`.
pub struct Fixture {
  pub buyer: User,
  pub other_buyer: User,
  pub seller: User,
  pub p1: Product,
  pub p2: Product,
}

impl Fixture {
  pub fn buyer_principal(&self) -> Principal {
    Principal::from(&self.buyer)
  }

  pub fn other_principal(&self) -> Principal {
    Principal::from(&self.other_buyer)
  }
}

pub fn test_app() -> TestApp {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let mailer = Arc::new(MockMailer::new("orders@example.com"));
  let state = AppState::new(AppConfig::default(), store.clone(), mailer.clone());
  TestApp { state, store, mailer }
}

pub fn dec(units: i64, scale: u32) -> Decimal {
  Decimal::new(units, scale)
}

pub async fn seed_fixture(app: &TestApp) -> Fixture {
  let store = app.store.as_ref();
  let buyer = catalog_service::create_user(store, "buyer@example.com").await.unwrap();
  let other_buyer = catalog_service::create_user(store, "other@example.com").await.unwrap();
  let seller = catalog_service::create_user(store, "seller@example.com").await.unwrap();
  let p1 = catalog_service::create_product(store, seller.id, "Desk Lamp", dec(10000, 2))
    .await
    .unwrap();
  let p2 = catalog_service::create_product(store, seller.id, "Office Chair", dec(8500, 2))
    .await
    .unwrap();
  Fixture {
    buyer,
    other_buyer,
    seller,
    p1,
    p2,
  }
}
