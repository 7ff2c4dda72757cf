// marketplace/src/services/order_service.rs

//! Placing and reading orders on behalf of a principal.

use crate::errors::{AppError, Result as AppResult};
use crate::models::PlacedOrder;
use crate::pipelines::contexts::{OrderParams, PlacementCtxData};
use crate::services::auth_service::Principal;
use crate::state::AppState;
use orderflow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Runs the placement pipeline and returns the committed order.
///
/// Validation failures come back as `AppError::Validation` with nothing
/// persisted. A failed confirmation email does not fail the call.
#[instrument(name = "order_service::place_order", skip(state, params), fields(user_id = %principal.user_id, units = params.product_ids.len()))]
pub async fn place_order(state: &AppState, principal: &Principal, params: OrderParams) -> AppResult<PlacedOrder> {
  let ctx_data = ContextData::new(PlacementCtxData::new(
    state.store.clone(),
    state.notifier.clone(),
    *principal,
    params,
  ));

  match state.registry.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let mut guard = ctx_data.write();
      if !guard.confirmation_sent {
        warn!("Order placed without a confirmation email.");
      }
      guard
        .placed_order
        .take()
        .ok_or_else(|| AppError::Internal("Placement completed without producing an order.".to_string()))
    }
    PipelineResult::Stopped => {
      warn!("Placement pipeline was stopped by a handler.");
      Err(AppError::PipelineHalted)
    }
  }
}

#[instrument(name = "order_service::list_orders", skip(state), fields(user_id = %principal.user_id))]
pub async fn list_orders(state: &AppState, principal: &Principal) -> AppResult<Vec<PlacedOrder>> {
  let orders = state.store.list_orders_for_user(principal.user_id).await?;
  info!(count = orders.len(), "Orders listed.");
  Ok(orders)
}

/// Another user's order is reported exactly like a missing one.
#[instrument(name = "order_service::get_order", skip(state), fields(user_id = %principal.user_id))]
pub async fn get_order(state: &AppState, principal: &Principal, order_id: Uuid) -> AppResult<PlacedOrder> {
  state
    .store
    .find_order_for_user(principal.user_id, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found.", order_id)))
}
