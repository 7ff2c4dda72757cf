// marketplace/src/pipelines/placement_pipeline.rs

//! Order placement: authorize, validate, resolve, persist, notify.
//!
//! Everything before `persist_order` only reads. `persist_order` is a single
//! atomic store call. `send_confirmation` is optional: once the order is
//! committed, a mailer failure is logged and the order is still returned.

use crate::errors::{AppError, ValidationErrors};
use crate::models::OrderDraft;
use crate::money;
use crate::pipelines::contexts::PlacementCtxData;
use crate::services::email_mock::OrderConfirmation;
use orderflow::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{error, info, instrument, warn};

pub const AUTHORIZE_PRINCIPAL: &str = "authorize_principal";
pub const VALIDATE_REQUEST: &str = "validate_placement_request";
pub const RESOLVE_PRODUCTS: &str = "resolve_products";
pub const PERSIST_ORDER: &str = "persist_order";
pub const SEND_CONFIRMATION: &str = "send_confirmation";

type StepResult = Result<PipelineControl, AppError>;

pub fn placement_pipeline() -> Pipeline<PlacementCtxData, AppError> {
  let mut p = Pipeline::<PlacementCtxData, AppError>::new(&[
    (AUTHORIZE_PRINCIPAL, false, None),
    (VALIDATE_REQUEST, false, None),
    (RESOLVE_PRODUCTS, false, None),
    (PERSIST_ORDER, false, None),
    (SEND_CONFIRMATION, true, None),
  ]);

  p.on(AUTHORIZE_PRINCIPAL, authorize_principal);
  p.on(VALIDATE_REQUEST, validate_placement_request);
  p.on(RESOLVE_PRODUCTS, resolve_products);
  p.on(PERSIST_ORDER, persist_order);
  p.on(SEND_CONFIRMATION, send_confirmation);
  p
}

pub fn register_placement_pipeline(registry: &Registry<AppError>) {
  registry.register_pipeline(placement_pipeline());
}

#[instrument(name = "placement::authorize_principal", skip_all, err(Display))]
async fn authorize_principal(ctx_data: ContextData<PlacementCtxData>) -> StepResult {
  let (store, principal) = ctx_data.extract(|c| (c.store.clone(), c.principal));

  let Some(owner) = store.find_user(principal.user_id).await? else {
    warn!(user_id = %principal.user_id, "Principal no longer resolves to a user.");
    return Err(AppError::Unauthenticated);
  };
  ctx_data.update(|c| c.owner = Some(owner));
  Ok(PipelineControl::Continue)
}

#[instrument(name = "placement::validate_placement_request", skip_all, err(Display))]
async fn validate_placement_request(ctx_data: ContextData<PlacementCtxData>) -> StepResult {
  let guard = ctx_data.read();
  let mut errors = ValidationErrors::new();

  if guard.params.total.is_some() {
    errors.add("total", "can't be set directly");
  }
  for raw_id in &guard.params.unparsed_product_ids {
    errors.add("product_ids", format!("references unknown product {}", raw_id));
  }
  if let Some(requested_owner) = guard.params.user_id {
    if requested_owner != guard.principal.user_id {
      errors.add("user_id", "must match the authenticated user");
    }
  }

  errors.into_result()?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "placement::resolve_products", skip_all, err(Display))]
async fn resolve_products(ctx_data: ContextData<PlacementCtxData>) -> StepResult {
  let (store, product_ids) = ctx_data.extract(|c| (c.store.clone(), c.params.product_ids.clone()));

  let rows = store.find_products(&product_ids).await?;
  let resolved = money::products_in_request_order(&product_ids, &rows)?;
  info!(units = resolved.len(), distinct = rows.len(), "Products resolved.");

  ctx_data.update(|c| c.resolved_products = resolved);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "placement::persist_order", skip_all, err(Display))]
async fn persist_order(ctx_data: ContextData<PlacementCtxData>) -> StepResult {
  let (store, draft) = {
    let guard = ctx_data.read();
    let owner = guard
      .owner
      .as_ref()
      .ok_or_else(|| AppError::Internal("persist_order ran before the owner was resolved".to_string()))?;
    let draft = OrderDraft {
      user_id: owner.id,
      product_ids: guard.params.product_ids.clone(),
    };
    (guard.store.clone(), draft)
  };

  let placed = store.place_order(&draft).await?;
  info!(
    order_id = %placed.id(),
    total = %money::format_amount(placed.order.total),
    placements = placed.product_count(),
    "Order placed."
  );

  ctx_data.write().placed_order = Some(placed);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "placement::send_confirmation", skip_all)]
async fn send_confirmation(ctx_data: ContextData<PlacementCtxData>) -> StepResult {
  let (notifier, confirmation) = {
    let guard = ctx_data.read();
    let (Some(owner), Some(placed)) = (guard.owner.as_ref(), guard.placed_order.as_ref()) else {
      return Err(AppError::Internal(
        "send_confirmation ran without a placed order".to_string(),
      ));
    };
    (guard.notifier.clone(), OrderConfirmation::for_order(owner, placed))
  };

  match notifier.send_order_confirmation(&confirmation).await {
    Ok(sent) => {
      info!(order_id = %confirmation.order_id, message_id = %sent.message_id, "Order confirmation sent.");
      ctx_data.write().confirmation_sent = true;
      Ok(PipelineControl::Continue)
    }
    Err(e) => {
      error!(order_id = %confirmation.order_id, error = %e, "NotificationFailed: order confirmation could not be sent.");
      Err(e)
    }
  }
}
