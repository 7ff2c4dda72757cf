// marketplace/src/store/memory.rs

use super::Store;
use crate::errors::{AppError, Result, ValidationErrors};
use crate::models::{NewProduct, NewUser, Order, OrderDraft, PlacedOrder, Placement, Product, User};
use crate::money;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
  users: HashMap<Uuid, User>,
  products: HashMap<Uuid, Product>,
  // Insertion order doubles as creation order.
  orders: Vec<Order>,
  placements: Vec<Placement>,
}

impl Tables {
  fn placed_order(&self, order: &Order) -> PlacedOrder {
    let mut placements: Vec<&Placement> = self.placements.iter().filter(|p| p.order_id == order.id).collect();
    placements.sort_by_key(|p| p.position);
    let products = placements
      .into_iter()
      .filter_map(|p| self.products.get(&p.product_id).cloned())
      .collect();
    PlacedOrder {
      order: order.clone(),
      products,
    }
  }
}

/// Process-local store. Every operation takes the table lock once, so a
/// `place_order` call is observed either completely or not at all.
#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn insert_user(&self, new_user: NewUser) -> Result<User> {
    let email = new_user.normalized_email();
    let mut tables = self.tables.write();
    if tables.users.values().any(|u| u.email == email) {
      return Err(ValidationErrors::single("email", "has already been taken").into());
    }
    let user = User {
      id: Uuid::new_v4(),
      email,
      auth_token: new_user.auth_token,
      created_at: Utc::now(),
    };
    tables.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
    Ok(self.tables.read().users.get(&user_id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.trim().to_lowercase();
    Ok(self.tables.read().users.values().find(|u| u.email == email).cloned())
  }

  async fn find_user_by_token(&self, auth_token: &str) -> Result<Option<User>> {
    Ok(
      self
        .tables
        .read()
        .users
        .values()
        .find(|u| u.auth_token == auth_token)
        .cloned(),
    )
  }

  #[instrument(name = "MemoryStore::delete_user", skip(self))]
  async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
    let mut tables = self.tables.write();
    if !tables.users.contains_key(&user_id) {
      return Ok(false);
    }
    if tables.products.values().any(|p| p.user_id == user_id) {
      return Err(ValidationErrors::single("user", "still owns products").into());
    }
    let order_ids: Vec<Uuid> = tables
      .orders
      .iter()
      .filter(|o| o.user_id == user_id)
      .map(|o| o.id)
      .collect();
    tables.placements.retain(|p| !order_ids.contains(&p.order_id));
    tables.orders.retain(|o| o.user_id != user_id);
    tables.users.remove(&user_id);
    info!(removed_orders = order_ids.len(), "User deleted.");
    Ok(true)
  }

  async fn insert_product(&self, new_product: NewProduct) -> Result<Product> {
    let mut tables = self.tables.write();
    if !tables.users.contains_key(&new_product.user_id) {
      return Err(ValidationErrors::single("user_id", "can't be blank").into());
    }
    let product = Product {
      id: Uuid::new_v4(),
      title: new_product.title,
      price: new_product.price,
      user_id: new_product.user_id,
      created_at: Utc::now(),
    };
    tables.products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    Ok(self.tables.read().products.get(&product_id).cloned())
  }

  async fn find_products(&self, product_ids: &[Uuid]) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    let mut found: Vec<Product> = Vec::new();
    for product_id in product_ids {
      if found.iter().any(|p| p.id == *product_id) {
        continue;
      }
      if let Some(product) = tables.products.get(product_id) {
        found.push(product.clone());
      }
    }
    Ok(found)
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    let mut products: Vec<Product> = self.tables.read().products.values().cloned().collect();
    products.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    Ok(products)
  }

  async fn update_product_price(&self, product_id: Uuid, price: Decimal) -> Result<Option<Product>> {
    let mut tables = self.tables.write();
    Ok(tables.products.get_mut(&product_id).map(|product| {
      product.price = price;
      product.clone()
    }))
  }

  #[instrument(name = "MemoryStore::place_order", skip(self, draft), fields(user_id = %draft.user_id, units = draft.product_ids.len()))]
  async fn place_order(&self, draft: &OrderDraft) -> Result<PlacedOrder> {
    let mut tables = self.tables.write();

    if !tables.users.contains_key(&draft.user_id) {
      return Err(ValidationErrors::single("user_id", "can't be blank").into());
    }
    // Prices are read under the same guard that stores the order.
    let total = money::compute_total(&draft.product_ids, |id| tables.products.get(&id).map(|p| p.price))
      .map_err(AppError::Validation)?;

    let order = Order {
      id: Uuid::new_v4(),
      user_id: draft.user_id,
      total,
      created_at: Utc::now(),
    };
    let placements = draft
      .product_ids
      .iter()
      .enumerate()
      .map(|(position, product_id)| {
        Ok(Placement {
          id: Uuid::new_v4(),
          order_id: order.id,
          product_id: *product_id,
          position: i32::try_from(position).map_err(|_| AppError::Internal("too many placements".to_string()))?,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    tables.placements.extend(placements);
    tables.orders.push(order.clone());
    debug!(order_id = %order.id, "Order stored in memory.");

    Ok(tables.placed_order(&order))
  }

  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<PlacedOrder>> {
    let tables = self.tables.read();
    Ok(
      tables
        .orders
        .iter()
        .filter(|o| o.user_id == user_id)
        .map(|o| tables.placed_order(o))
        .collect(),
    )
  }

  async fn find_order_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<PlacedOrder>> {
    let tables = self.tables.read();
    Ok(
      tables
        .orders
        .iter()
        .find(|o| o.id == order_id && o.user_id == user_id)
        .map(|o| tables.placed_order(o)),
    )
  }

  async fn count_orders(&self) -> Result<usize> {
    Ok(self.tables.read().orders.len())
  }

  async fn count_placements(&self) -> Result<usize> {
    Ok(self.tables.read().placements.len())
  }
}
