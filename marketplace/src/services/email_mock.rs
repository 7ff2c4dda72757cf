// marketplace/src/services/email_mock.rs

//! Notification collaborator and an in-process mailer that records what it sends.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{PlacedOrder, User};
use crate::money::format_amount;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationLine {
  pub title: String,
  pub price: String,
}

/// Everything the confirmation email says about a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
  pub recipient: String,
  pub subject: String,
  pub order_id: Uuid,
  pub product_count: usize,
  pub total: String,
  pub lines: Vec<ConfirmationLine>,
}

impl OrderConfirmation {
  pub fn for_order(recipient: &User, placed: &PlacedOrder) -> Self {
    Self {
      recipient: recipient.email.clone(),
      subject: "Order Confirmation".to_string(),
      order_id: placed.id(),
      product_count: placed.product_count(),
      total: format_amount(placed.order.total),
      lines: placed
        .products
        .iter()
        .map(|p| ConfirmationLine {
          title: p.title.clone(),
          price: format_amount(p.price),
        })
        .collect(),
    }
  }

  fn render_text(&self) -> String {
    let mut body = format!(
      "Order {}\nYou ordered {} product(s):\n",
      self.order_id, self.product_count
    );
    for line in &self.lines {
      body.push_str(&format!("  {}: {}\n", line.title, line.price));
    }
    body.push_str(&format!("Total: {}\n", self.total));
    body
  }
}

#[derive(Debug, Clone)]
pub struct SentEmailInfo {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub body_preview: String,
  pub message_id: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
  async fn send_order_confirmation(&self, confirmation: &OrderConfirmation) -> AppResult<SentEmailInfo>;
}

/// Simulated delivery. Keeps every sent confirmation in an outbox and can be
/// switched into failure mode.
pub struct MockMailer {
  sender: String,
  outbox: Mutex<Vec<OrderConfirmation>>,
  failing: AtomicBool,
}

impl MockMailer {
  pub fn new(sender: impl Into<String>) -> Self {
    Self {
      sender: sender.into(),
      outbox: Mutex::new(Vec::new()),
      failing: AtomicBool::new(false),
    }
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn sent(&self) -> Vec<OrderConfirmation> {
    self.outbox.lock().clone()
  }
}

#[async_trait]
impl Notifier for MockMailer {
  #[instrument(name = "MockMailer::send_order_confirmation", skip(self, confirmation), fields(order_id = %confirmation.order_id, to = %confirmation.recipient))]
  async fn send_order_confirmation(&self, confirmation: &OrderConfirmation) -> AppResult<SentEmailInfo> {
    info!("Simulating sending order confirmation email.");
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    if self.failing.load(Ordering::SeqCst) {
      warn!("Simulated email failure.");
      return Err(AppError::Notification("Simulated email send failure".to_string()));
    }

    let body = confirmation.render_text();
    let message_id = format!("mock_email_{}", Uuid::new_v4());
    self.outbox.lock().push(confirmation.clone());
    info!(%message_id, "Mock email sent successfully.");

    Ok(SentEmailInfo {
      to: confirmation.recipient.clone(),
      from: self.sender.clone(),
      subject: confirmation.subject.clone(),
      body_preview: body.chars().take(50).collect(),
      message_id,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{Order, Product};
  use chrono::Utc;
  use rust_decimal::Decimal;

  fn placed() -> (User, PlacedOrder) {
    let user = User {
      id: Uuid::new_v4(),
      email: "buyer@example.com".to_string(),
      auth_token: "tok".to_string(),
      created_at: Utc::now(),
    };
    let product = Product {
      id: Uuid::new_v4(),
      title: "Lamp".to_string(),
      price: Decimal::new(4250, 2),
      user_id: Uuid::new_v4(),
      created_at: Utc::now(),
    };
    let placed = PlacedOrder {
      order: Order {
        id: Uuid::new_v4(),
        user_id: user.id,
        total: Decimal::new(8500, 2),
        created_at: Utc::now(),
      },
      products: vec![product.clone(), product],
    };
    (user, placed)
  }

  #[test]
  fn confirmation_lists_every_unit() {
    let (user, placed) = placed();
    let confirmation = OrderConfirmation::for_order(&user, &placed);
    assert_eq!(confirmation.recipient, "buyer@example.com");
    assert_eq!(confirmation.product_count, 2);
    assert_eq!(confirmation.total, "85.00");
    assert_eq!(confirmation.lines[0].price, "42.50");
    assert!(confirmation.render_text().contains("Lamp: 42.50"));
  }

  #[tokio::test]
  async fn failing_mailer_records_nothing() {
    let (user, placed) = placed();
    let mailer = MockMailer::new("noreply@example.com");
    mailer.set_failing(true);
    let result = mailer
      .send_order_confirmation(&OrderConfirmation::for_order(&user, &placed))
      .await;
    assert!(matches!(result, Err(AppError::Notification(_))));
    assert!(mailer.sent().is_empty());

    mailer.set_failing(false);
    let info = mailer
      .send_order_confirmation(&OrderConfirmation::for_order(&user, &placed))
      .await
      .unwrap();
    assert_eq!(info.from, "noreply@example.com");
    assert_eq!(mailer.sent().len(), 1);
  }
}
