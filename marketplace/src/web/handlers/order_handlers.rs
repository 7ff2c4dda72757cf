// marketplace/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipelines::contexts::OrderParams;
use crate::services::order_service;
use crate::state::AppState;
use crate::views::OrderView;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct PlaceOrderPayload {
  pub order: OrderParams,
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.principal.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_orders(&app_state, &auth_user.principal).await?;
  let views: Vec<OrderView> = orders.iter().map(OrderView::from).collect();
  Ok(HttpResponse::Ok().json(json!({ "orders": views })))
}

#[instrument(name = "handler::get_order", skip(app_state, auth_user, path), fields(user_id = %auth_user.principal.user_id, order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let placed = order_service::get_order(&app_state, &auth_user.principal, order_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": OrderView::from(&placed) })))
}

#[instrument(
    name = "handler::place_order",
    skip(app_state, auth_user, payload),
    fields(user_id = %auth_user.principal.user_id, units = payload.order.product_ids.len())
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<PlaceOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let params = payload.into_inner().order;
  let placed = order_service::place_order(&app_state, &auth_user.principal, params).await?;
  info!(order_id = %placed.id(), "Order created.");
  Ok(HttpResponse::Created().json(json!({ "order": OrderView::from(&placed) })))
}
