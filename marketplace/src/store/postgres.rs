// marketplace/src/store/postgres.rs

use super::Store;
use crate::errors::{AppError, Result, ValidationErrors};
use crate::models::{NewProduct, NewUser, Order, OrderDraft, PlacedOrder, Product, User};
use crate::money;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{error, info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, auth_token, created_at";
const PRODUCT_COLUMNS: &str = "id, title, price, user_id, created_at";

/// A product row tagged with the order it was placed in.
#[derive(FromRow)]
struct PlacedProductRow {
  order_id: Uuid,
  #[sqlx(flatten)]
  product: Product,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .map_err(|e| AppError::Internal(format!("Database migration failed: {}", e)))?;
    info!("Database migrations applied.");
    Ok(())
  }

  async fn placed_orders(&self, orders: Vec<Order>) -> Result<Vec<PlacedOrder>> {
    if orders.is_empty() {
      return Ok(Vec::new());
    }
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let rows: Vec<PlacedProductRow> = sqlx::query_as(
      "SELECT pl.order_id, p.id, p.title, p.price, p.user_id, p.created_at \
       FROM placements pl JOIN products p ON p.id = pl.product_id \
       WHERE pl.order_id = ANY($1) ORDER BY pl.order_id, pl.position",
    )
    .bind(&order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut by_order: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for row in rows {
      by_order.entry(row.order_id).or_default().push(row.product);
    }
    Ok(
      orders
        .into_iter()
        .map(|order| {
          let products = by_order.remove(&order.id).unwrap_or_default();
          PlacedOrder { order, products }
        })
        .collect(),
    )
  }

  async fn insert_placements(tx: &mut Transaction<'_, Postgres>, order_id: Uuid, product_ids: &[Uuid]) -> Result<()> {
    for (position, product_id) in product_ids.iter().enumerate() {
      let position = i32::try_from(position).map_err(|_| AppError::Internal("too many placements".to_string()))?;
      sqlx::query("INSERT INTO placements (id, order_id, product_id, position) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(product_id)
        .bind(position)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
          if is_foreign_key_violation(&e) {
            let mut errors = ValidationErrors::new();
            money::unknown_product(&mut errors, *product_id);
            AppError::Validation(errors)
          } else {
            AppError::Sqlx(e)
          }
        })?;
    }
    Ok(())
  }
}

#[async_trait]
impl Store for PgStore {
  async fn insert_user(&self, new_user: NewUser) -> Result<User> {
    let query = format!(
      "INSERT INTO users (id, email, auth_token, created_at) VALUES ($1, $2, $3, $4) RETURNING {}",
      USER_COLUMNS
    );
    sqlx::query_as(&query)
      .bind(Uuid::new_v4())
      .bind(new_user.normalized_email())
      .bind(&new_user.auth_token)
      .bind(Utc::now())
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          ValidationErrors::single("email", "has already been taken").into()
        } else {
          AppError::Sqlx(e)
        }
      })
  }

  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    Ok(sqlx::query_as(&query).bind(user_id).fetch_optional(&self.pool).await?)
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
    Ok(sqlx::query_as(&query).bind(email.trim()).fetch_optional(&self.pool).await?)
  }

  async fn find_user_by_token(&self, auth_token: &str) -> Result<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE auth_token = $1", USER_COLUMNS);
    Ok(sqlx::query_as(&query).bind(auth_token).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "PgStore::delete_user", skip(self))]
  async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
    let mut tx = self.pool.begin().await?;
    let (owned_products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(&mut *tx)
      .await?;
    if owned_products > 0 {
      return Err(ValidationErrors::single("user", "still owns products").into());
    }
    // orders and placements go with the user (ON DELETE CASCADE)
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(user_id)
      .execute(&mut *tx)
      .await?
      .rows_affected();
    tx.commit().await?;
    Ok(deleted > 0)
  }

  async fn insert_product(&self, new_product: NewProduct) -> Result<Product> {
    let query = format!(
      "INSERT INTO products (id, title, price, user_id, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PRODUCT_COLUMNS
    );
    sqlx::query_as(&query)
      .bind(Uuid::new_v4())
      .bind(&new_product.title)
      .bind(new_product.price)
      .bind(new_product.user_id)
      .bind(Utc::now())
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        if is_foreign_key_violation(&e) {
          ValidationErrors::single("user_id", "can't be blank").into()
        } else {
          AppError::Sqlx(e)
        }
      })
  }

  async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
    Ok(sqlx::query_as(&query).bind(product_id).fetch_optional(&self.pool).await?)
  }

  async fn find_products(&self, product_ids: &[Uuid]) -> Result<Vec<Product>> {
    let query = format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS);
    Ok(sqlx::query_as(&query).bind(product_ids).fetch_all(&self.pool).await?)
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    let query = format!("SELECT {} FROM products ORDER BY title ASC, id ASC", PRODUCT_COLUMNS);
    Ok(sqlx::query_as(&query).fetch_all(&self.pool).await?)
  }

  async fn update_product_price(&self, product_id: Uuid, price: Decimal) -> Result<Option<Product>> {
    let query = format!("UPDATE products SET price = $1 WHERE id = $2 RETURNING {}", PRODUCT_COLUMNS);
    Ok(
      sqlx::query_as(&query)
        .bind(price)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  #[instrument(name = "PgStore::place_order", skip(self, draft), fields(user_id = %draft.user_id, units = draft.product_ids.len()))]
  async fn place_order(&self, draft: &OrderDraft) -> Result<PlacedOrder> {
    // Dropping `tx` on any early return rolls everything back.
    let mut tx = self.pool.begin().await?;

    let owner: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
      .bind(draft.user_id)
      .fetch_optional(&mut *tx)
      .await?;
    if owner.is_none() {
      return Err(ValidationErrors::single("user_id", "can't be blank").into());
    }

    let order_id = Uuid::new_v4();
    let created_at = Utc::now();
    sqlx::query("INSERT INTO orders (id, user_id, total, created_at) VALUES ($1, $2, NULL, $3)")
      .bind(order_id)
      .bind(draft.user_id)
      .bind(created_at)
      .execute(&mut *tx)
      .await?;

    Self::insert_placements(&mut tx, order_id, &draft.product_ids).await?;

    // Current prices of the associated products, locked until commit.
    let query = format!(
      "SELECT {} FROM products WHERE id IN (SELECT product_id FROM placements WHERE order_id = $1) FOR SHARE",
      PRODUCT_COLUMNS
    );
    let rows: Vec<Product> = sqlx::query_as(&query).bind(order_id).fetch_all(&mut *tx).await?;
    let prices: HashMap<Uuid, Decimal> = rows.iter().map(|p| (p.id, p.price)).collect();
    let total = money::compute_total(&draft.product_ids, |id| prices.get(&id).copied()).map_err(AppError::Validation)?;

    sqlx::query("UPDATE orders SET total = $1 WHERE id = $2")
      .bind(total)
      .bind(order_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await.map_err(|e| {
      error!(error = %e, %order_id, "Commit of placed order failed.");
      AppError::Sqlx(e)
    })?;

    let products = money::products_in_request_order(&draft.product_ids, &rows).map_err(AppError::Validation)?;
    Ok(PlacedOrder {
      order: Order {
        id: order_id,
        user_id: draft.user_id,
        total,
        created_at,
      },
      products,
    })
  }

  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<PlacedOrder>> {
    let orders: Vec<Order> = sqlx::query_as(
      "SELECT id, user_id, total, created_at FROM orders \
       WHERE user_id = $1 AND total IS NOT NULL ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    self.placed_orders(orders).await
  }

  async fn find_order_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<PlacedOrder>> {
    let order: Option<Order> = sqlx::query_as(
      "SELECT id, user_id, total, created_at FROM orders \
       WHERE id = $1 AND user_id = $2 AND total IS NOT NULL",
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    match order {
      Some(order) => Ok(self.placed_orders(vec![order]).await?.into_iter().next()),
      None => Ok(None),
    }
  }

  async fn count_orders(&self) -> Result<usize> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders").fetch_one(&self.pool).await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }

  async fn count_placements(&self) -> Result<usize> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM placements").fetch_one(&self.pool).await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }
}
