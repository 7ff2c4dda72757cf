// marketplace/src/services/catalog_service.rs

//! Users and products: creation with field validation, lookups and re-pricing.

use crate::errors::{AppError, Result as AppResult, ValidationErrors};
use crate::models::{NewProduct, NewUser, Product, User};
use crate::money;
use crate::services::auth_service;
use crate::store::Store;
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

/// `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((name, tld)) => !name.is_empty() && !tld.is_empty() && !name.ends_with('.'),
    None => false,
  }
}

/// Checks a price already rounded to cents.
fn validate_price(errors: &mut ValidationErrors, price: Decimal) {
  if price < Decimal::ZERO {
    errors.add("price", "must be greater than or equal to 0");
  }
  if price > money::MAX_PRICE {
    errors.add("price", format!("must be less than or equal to {}", money::MAX_PRICE));
  }
}

/// Creates a user with a freshly issued token.
#[instrument(name = "catalog_service::create_user", skip(store))]
pub async fn create_user(store: &dyn Store, email: &str) -> AppResult<User> {
  let email = email.trim();
  let mut errors = ValidationErrors::new();
  if email.is_empty() {
    errors.add("email", "can't be blank");
  } else if !is_valid_email(email) {
    errors.add("email", "is invalid");
  } else if store.find_user_by_email(email).await?.is_some() {
    errors.add("email", "has already been taken");
  }
  errors.into_result()?;

  let user = store
    .insert_user(NewUser {
      email: email.to_string(),
      auth_token: auth_service::generate_token(),
    })
    .await?;
  info!(user_id = %user.id, "User created.");
  Ok(user)
}

pub async fn find_user(store: &dyn Store, user_id: Uuid) -> AppResult<User> {
  store
    .find_user(user_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", user_id)))
}

/// Removes a user together with their orders.
#[instrument(name = "catalog_service::delete_user", skip(store))]
pub async fn delete_user(store: &dyn Store, user_id: Uuid) -> AppResult<()> {
  if store.delete_user(user_id).await? {
    info!("User deleted.");
    Ok(())
  } else {
    Err(AppError::NotFound(format!("User with ID {} not found.", user_id)))
  }
}

#[instrument(name = "catalog_service::create_product", skip(store, price), fields(price = %price))]
pub async fn create_product(store: &dyn Store, user_id: Uuid, title: &str, price: Decimal) -> AppResult<Product> {
  let title = title.trim();
  let price = money::round_to_cents(price);
  let mut errors = ValidationErrors::new();
  if title.is_empty() {
    errors.add("title", "can't be blank");
  }
  validate_price(&mut errors, price);
  if store.find_user(user_id).await?.is_none() {
    errors.add("user_id", "can't be blank");
  }
  errors.into_result()?;

  let product = store
    .insert_product(NewProduct {
      title: title.to_string(),
      price,
      user_id,
    })
    .await?;
  info!(product_id = %product.id, "Product created.");
  Ok(product)
}

pub async fn find_product(store: &dyn Store, product_id: Uuid) -> AppResult<Product> {
  store
    .find_product(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))
}

pub async fn list_products(store: &dyn Store) -> AppResult<Vec<Product>> {
  store.list_products().await
}

/// Later orders are totalled with the new price; placed orders keep theirs.
#[instrument(name = "catalog_service::update_product_price", skip(store, price), fields(price = %price))]
pub async fn update_product_price(store: &dyn Store, product_id: Uuid, price: Decimal) -> AppResult<Product> {
  let price = money::round_to_cents(price);
  let mut errors = ValidationErrors::new();
  validate_price(&mut errors, price);
  errors.into_result()?;

  store
    .update_product_price(product_id, price)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))
}
