// tests/order_query_tests.rs
mod common;

use common::*;
use marketplace_api::errors::AppError;
use marketplace_api::pipelines::contexts::OrderParams;
use marketplace_api::services::order_service;
use uuid::Uuid;

#[tokio::test]
async fn test_list_orders_is_scoped_to_principal() {
  let app = test_app();
  let fx = seed_fixture(&app).await;

  let first = order_service::place_order(&app.state, &fx.buyer_principal(), OrderParams::for_products(vec![fx.p1.id]))
    .await
    .unwrap();
  let second = order_service::place_order(&app.state, &fx.buyer_principal(), OrderParams::for_products(vec![fx.p2.id]))
    .await
    .unwrap();
  order_service::place_order(&app.state, &fx.other_principal(), OrderParams::for_products(vec![fx.p1.id]))
    .await
    .unwrap();

  let mine = order_service::list_orders(&app.state, &fx.buyer_principal()).await.unwrap();
  let ids: Vec<Uuid> = mine.iter().map(|o| o.order.id).collect();
  assert_eq!(ids, vec![first.order.id, second.order.id]);
  assert!(mine.iter().all(|o| o.order.user_id == fx.buyer.id));
}

#[tokio::test]
async fn test_list_orders_empty_for_new_user() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let orders = order_service::list_orders(&app.state, &fx.other_principal()).await.unwrap();
  assert!(orders.is_empty());
}

#[tokio::test]
async fn test_foreign_order_looks_missing() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let theirs = order_service::place_order(&app.state, &fx.other_principal(), OrderParams::for_products(vec![fx.p1.id]))
    .await
    .unwrap();

  let foreign = order_service::get_order(&app.state, &fx.buyer_principal(), theirs.order.id).await;
  let missing = order_service::get_order(&app.state, &fx.buyer_principal(), Uuid::new_v4()).await;

  assert!(matches!(foreign, Err(AppError::NotFound(_))), "got {:?}", foreign);
  assert!(matches!(missing, Err(AppError::NotFound(_))), "got {:?}", missing);
}

#[tokio::test]
async fn test_get_order_returns_products_in_placement_order() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let placed = order_service::place_order(
    &app.state,
    &fx.buyer_principal(),
    OrderParams::for_products(vec![fx.p2.id, fx.p1.id, fx.p2.id]),
  )
  .await
  .unwrap();

  let fetched = order_service::get_order(&app.state, &fx.buyer_principal(), placed.order.id)
    .await
    .unwrap();
  let titles: Vec<&str> = fetched.products.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, vec!["Office Chair", "Desk Lamp", "Office Chair"]);
  assert_eq!(fetched.order.total, dec(27000, 2));
}
