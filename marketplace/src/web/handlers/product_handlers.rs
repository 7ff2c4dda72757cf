// marketplace/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Product, User};
use crate::services::catalog_service;
use crate::state::AppState;
use crate::views::ProductView;

async fn owner_of(app_state: &AppState, cache: &mut HashMap<Uuid, User>, product: &Product) -> Result<User, AppError> {
  if let Some(owner) = cache.get(&product.user_id) {
    return Ok(owner.clone());
  }
  let owner = app_state
    .store
    .find_user(product.user_id)
    .await?
    .ok_or_else(|| AppError::Internal(format!("Product {} has no owner.", product.id)))?;
  cache.insert(owner.id, owner.clone());
  Ok(owner)
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog_service::list_products(app_state.store.as_ref()).await?;
  let mut owners = HashMap::new();
  let mut views = Vec::with_capacity(products.len());
  for product in &products {
    let owner = owner_of(&app_state, &mut owners, product).await?;
    views.push(ProductView::new(product, &owner));
  }
  info!("Successfully fetched {} products.", views.len());
  Ok(HttpResponse::Ok().json(json!({ "products": views })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = catalog_service::find_product(app_state.store.as_ref(), path.into_inner()).await?;
  let owner = owner_of(&app_state, &mut HashMap::new(), &product).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": ProductView::new(&product, &owner) })))
}
