// marketplace/src/seed.rs

//! Demo data for `SEED_DB=true`.

use crate::errors::Result as AppResult;
use crate::models::User;
use crate::services::catalog_service;
use crate::store::Store;
use rust_decimal::Decimal;
use tracing::info;

const SELLER_EMAIL: &str = "seller@example.com";
const BUYER_EMAIL: &str = "buyer@example.com";

/// Creates a seller with a few products and a buyer. Does nothing if the
/// seller already exists. Returns the users that were created.
pub async fn seed_demo_data(store: &dyn Store) -> AppResult<Vec<User>> {
  if store.find_user_by_email(SELLER_EMAIL).await?.is_some() {
    info!("Demo data already present, skipping seed.");
    return Ok(Vec::new());
  }

  let seller = catalog_service::create_user(store, SELLER_EMAIL).await?;
  let buyer = catalog_service::create_user(store, BUYER_EMAIL).await?;

  for (title, price) in [
    ("Desk Lamp", Decimal::new(100_00, 2)),
    ("Office Chair", Decimal::new(85_00, 2)),
    ("Notebook", Decimal::new(4_50, 2)),
    ("Mechanical Keyboard", Decimal::new(129_99, 2)),
  ] {
    catalog_service::create_product(store, seller.id, title, price).await?;
  }

  // Printed so the demo can be driven with curl.
  for user in [&seller, &buyer] {
    info!(email = %user.email, token = %user.auth_token, "Seeded demo user.");
  }
  Ok(vec![seller, buyer])
}
