// marketplace/src/models/placement.rs

use sqlx::FromRow;
use uuid::Uuid;

/// One ordered unit: links an order to a product. Ordering the same product
/// twice yields two placements.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Placement {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  /// Index in the requested `product_ids`, so orders read back in request order.
  pub position: i32,
}
