// marketplace/src/pipelines/contexts.rs

//! Data structs that pipelines run over. Handlers receive them wrapped in
//! `orderflow::ContextData`.

use crate::models::{PlacedOrder, Product, User};
use crate::services::auth_service::Principal;
use crate::services::email_mock::Notifier;
use crate::store::Store;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// The client's `order` object. `total` and `user_id` are accepted only so
/// that a client trying to set them gets a field error instead of silence.
///
/// `product_ids` entries that are not UUIDs are kept, as written, in
/// `unparsed_product_ids` and reported as unknown products.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawOrderParams")]
pub struct OrderParams {
  pub product_ids: Vec<Uuid>,
  pub unparsed_product_ids: Vec<String>,
  /// `Some` whenever the key is present, including `"total": null`.
  pub total: Option<Value>,
  pub user_id: Option<Uuid>,
}

impl OrderParams {
  pub fn for_products(product_ids: Vec<Uuid>) -> Self {
    Self {
      product_ids,
      ..Default::default()
    }
  }
}

#[derive(Deserialize)]
struct RawOrderParams {
  #[serde(default)]
  product_ids: Vec<Value>,
  #[serde(default, deserialize_with = "present_value")]
  total: Option<Value>,
  #[serde(default)]
  user_id: Option<Uuid>,
}

// Only called when the key exists, so an explicit null becomes `Some(Value::Null)`.
fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
  Value::deserialize(deserializer).map(Some)
}

impl From<RawOrderParams> for OrderParams {
  fn from(raw: RawOrderParams) -> Self {
    let mut product_ids = Vec::with_capacity(raw.product_ids.len());
    let mut unparsed_product_ids = Vec::new();
    for value in raw.product_ids {
      match value {
        Value::String(text) => match Uuid::parse_str(&text) {
          Ok(product_id) => product_ids.push(product_id),
          Err(_) => unparsed_product_ids.push(text),
        },
        other => unparsed_product_ids.push(other.to_string()),
      }
    }
    Self {
      product_ids,
      unparsed_product_ids,
      total: raw.total,
      user_id: raw.user_id,
    }
  }
}

#[derive(Clone)]
pub struct PlacementCtxData {
  pub store: Arc<dyn Store>,
  pub notifier: Arc<dyn Notifier>,
  pub principal: Principal,
  pub params: OrderParams,

  // Filled in by the pipeline:
  pub owner: Option<User>,
  pub resolved_products: Vec<Product>,
  pub placed_order: Option<PlacedOrder>,
  pub confirmation_sent: bool,
}

impl PlacementCtxData {
  pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, principal: Principal, params: OrderParams) -> Self {
    Self {
      store,
      notifier,
      principal,
      params,
      owner: None,
      resolved_products: Vec::new(),
      placed_order: None,
      confirmation_sent: false,
    }
  }
}
