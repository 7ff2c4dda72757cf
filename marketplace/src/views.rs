// marketplace/src/views.rs

//! JSON projections. A product has two shapes: standalone (with its owner)
//! and embedded in an order (without).

use crate::models::{PlacedOrder, Product, User};
use crate::money::format_amount;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
  pub id: Uuid,
  pub email: String,
}

impl From<&User> for UserSummary {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      email: user.email.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
  pub id: Uuid,
  pub title: String,
  pub price: String,
  pub user: UserSummary,
}

impl ProductView {
  pub fn new(product: &Product, owner: &User) -> Self {
    Self {
      id: product.id,
      title: product.title.clone(),
      price: format_amount(product.price),
      user: UserSummary::from(owner),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedProductView {
  pub id: Uuid,
  pub title: String,
  pub price: String,
}

impl From<&Product> for EmbeddedProductView {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      title: product.title.clone(),
      price: format_amount(product.price),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
  pub id: Uuid,
  pub total: String,
  pub products: Vec<EmbeddedProductView>,
}

impl From<&PlacedOrder> for OrderView {
  fn from(placed: &PlacedOrder) -> Self {
    Self {
      id: placed.order.id,
      total: format_amount(placed.order.total),
      products: placed.products.iter().map(EmbeddedProductView::from).collect(),
    }
  }
}
