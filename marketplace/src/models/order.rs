// marketplace/src/models/order.rs

use super::product::Product;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// An order whose total has not been computed yet. Only lives inside the
/// persistence transaction and is never returned to a caller.
#[derive(Debug, Clone)]
pub struct OrderDraft {
  pub user_id: Uuid,
  pub product_ids: Vec<Uuid>,
}

/// A placed order. `total` is always the server-computed sum.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
}

/// An order together with its products, one entry per placement, in placement order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
  pub order: Order,
  pub products: Vec<Product>,
}

impl PlacedOrder {
  pub fn id(&self) -> Uuid {
    self.order.id
  }

  pub fn product_count(&self) -> usize {
    self.products.len()
  }
}
