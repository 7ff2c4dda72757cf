// marketplace/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub title: String,
  pub price: Decimal,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
  pub title: String,
  pub price: Decimal,
  pub user_id: Uuid,
}
