// marketplace/src/store/mod.rs

//! Persistence collaborator.
//!
//! `place_order` is the only multi-row write and must be atomic: either the
//! order, all of its placements and its total are stored, or nothing is.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::errors::Result;
use crate::models::{NewProduct, NewUser, OrderDraft, PlacedOrder, Product, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

#[async_trait]
pub trait Store: Send + Sync {
  /// Fails with an `email` validation error if the address is already taken.
  async fn insert_user(&self, new_user: NewUser) -> Result<User>;
  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;
  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn find_user_by_token(&self, auth_token: &str) -> Result<Option<User>>;
  /// Removes the user with its orders and their placements. Returns `false`
  /// if there was no such user. Users who still own products cannot be removed.
  async fn delete_user(&self, user_id: Uuid) -> Result<bool>;

  async fn insert_product(&self, new_product: NewProduct) -> Result<Product>;
  async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>>;
  /// Distinct rows for the ids that exist; unknown ids are simply absent.
  async fn find_products(&self, product_ids: &[Uuid]) -> Result<Vec<Product>>;
  async fn list_products(&self) -> Result<Vec<Product>>;
  async fn update_product_price(&self, product_id: Uuid, price: Decimal) -> Result<Option<Product>>;

  /// Creates the order and its placements, computes the total from current
  /// prices and stores it, all in one atomic unit.
  async fn place_order(&self, draft: &OrderDraft) -> Result<PlacedOrder>;
  /// Orders owned by `user_id`, oldest first.
  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<PlacedOrder>>;
  /// `None` both when the order does not exist and when another user owns it.
  async fn find_order_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<PlacedOrder>>;

  async fn count_orders(&self) -> Result<usize>;
  async fn count_placements(&self) -> Result<usize>;
}
