// tests/http_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use marketplace_api::store::Store;
use marketplace_api::web::configure_app_routes;
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn bearer(token: &str) -> (&'static str, String) {
  ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_health_needs_no_token() {
  let app = test_app();
  let service = init_app!(app.state);

  let resp = test::call_service(&service, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_place_order_returns_201_with_projection() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.buyer.auth_token))
    .set_json(json!({ "order": { "product_ids": [fx.p1.id, fx.p2.id] } }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["order"]["total"], "185.00");
  let products = body["order"]["products"].as_array().unwrap();
  assert_eq!(products.len(), 2);
  assert_eq!(products[0], json!({ "id": fx.p1.id, "title": "Desk Lamp", "price": "100.00" }));
  assert!(products[1].get("user").is_none());
}

#[actix_web::test]
async fn test_raw_token_header_is_accepted() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let req = test::TestRequest::get()
    .uri("/api/v1/orders")
    .insert_header(("Authorization", fx.buyer.auth_token.clone()))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "orders": [] }));
}

#[actix_web::test]
async fn test_validation_errors_are_422_field_maps() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);
  let unknown = Uuid::new_v4();

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.buyer.auth_token))
    .set_json(json!({ "order": { "product_ids": [unknown] } }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body,
    json!({ "errors": { "product_ids": [format!("references unknown product {}", unknown)] } })
  );

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.buyer.auth_token))
    .set_json(json!({ "order": { "product_ids": [fx.p1.id], "total": "0.01" } }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "errors": { "total": ["can't be set directly"] } }));

  assert_eq!(app.mailer.sent().len(), 0);
}

#[actix_web::test]
async fn test_non_uuid_product_ids_and_null_total_are_field_errors() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.buyer.auth_token))
    .set_json(json!({ "order": { "product_ids": [fx.p1.id, 42, "lamp"] } }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body,
    json!({ "errors": { "product_ids": ["references unknown product 42", "references unknown product lamp"] } })
  );

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.buyer.auth_token))
    .set_json(json!({ "order": { "product_ids": [fx.p1.id], "total": null } }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "errors": { "total": ["can't be set directly"] } }));

  assert_eq!(app.store.count_orders().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_malformed_body_is_422() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.buyer.auth_token))
    .set_json(json!({ "product_ids": [fx.p1.id] }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["errors"]["request"].is_array());
}

#[actix_web::test]
async fn test_missing_or_bad_token_is_401() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let no_token = test::TestRequest::get().uri("/api/v1/orders").to_request();
  assert_eq!(test::call_service(&service, no_token).await.status(), StatusCode::UNAUTHORIZED);

  let bad_token = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer("not-a-real-token"))
    .set_json(json!({ "order": { "product_ids": [fx.p1.id] } }))
    .to_request();
  assert_eq!(test::call_service(&service, bad_token).await.status(), StatusCode::UNAUTHORIZED);

  let by_id = test::TestRequest::get()
    .uri(&format!("/api/v1/orders/{}", Uuid::new_v4()))
    .to_request();
  assert_eq!(test::call_service(&service, by_id).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_foreign_order_is_404() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .insert_header(bearer(&fx.other_buyer.auth_token))
    .set_json(json!({ "order": { "product_ids": [fx.p2.id] } }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  let order_id = body["order"]["id"].as_str().unwrap().to_string();

  let own = test::TestRequest::get()
    .uri(&format!("/api/v1/orders/{}", order_id))
    .insert_header(bearer(&fx.other_buyer.auth_token))
    .to_request();
  let resp = test::call_service(&service, own).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["order"]["total"], "85.00");

  let foreign = test::TestRequest::get()
    .uri(&format!("/api/v1/orders/{}", order_id))
    .insert_header(bearer(&fx.buyer.auth_token))
    .to_request();
  assert_eq!(test::call_service(&service, foreign).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_products_embed_their_owner() {
  let app = test_app();
  let fx = seed_fixture(&app).await;
  let service = init_app!(app.state);

  let req = test::TestRequest::get()
    .uri(&format!("/api/v1/products/{}", fx.p2.id))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(
    body,
    json!({
      "product": {
        "id": fx.p2.id,
        "title": "Office Chair",
        "price": "85.00",
        "user": { "id": fx.seller.id, "email": "seller@example.com" },
      }
    })
  );

  let list: Value =
    test::call_and_read_body_json(&service, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
  let titles: Vec<&str> = list["products"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["title"].as_str().unwrap())
    .collect();
  assert_eq!(titles, vec!["Desk Lamp", "Office Chair"]);

  let missing = test::TestRequest::get()
    .uri(&format!("/api/v1/products/{}", Uuid::new_v4()))
    .to_request();
  assert_eq!(test::call_service(&service, missing).await.status(), StatusCode::NOT_FOUND);
}
