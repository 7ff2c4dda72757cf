// marketplace/src/money.rs

//! Amount formatting and the order-total computation.

use crate::errors::ValidationErrors;
use crate::models::Product;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use uuid::Uuid;

/// Largest price a `NUMERIC(12,2)` column holds: 9999999999.99.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rounds to cents, half away from zero. Stored prices and printed amounts agree.
pub fn round_to_cents(amount: Decimal) -> Decimal {
  amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-decimal string form used in every response, e.g. `185.00`.
pub fn format_amount(amount: Decimal) -> String {
  let mut rounded = round_to_cents(amount);
  rounded.rescale(2);
  rounded.to_string()
}

pub fn unknown_product(errors: &mut ValidationErrors, product_id: Uuid) {
  errors.add("product_ids", format!("references unknown product {}", product_id));
}

/// Sums the current price of every referenced product. A product listed twice
/// is counted twice.
///
/// Fails with `product_ids` errors for ids `price_of` cannot resolve, and with
/// a `total` error if the sum is negative or does not fit in a `Decimal`.
pub fn compute_total(product_ids: &[Uuid], price_of: impl Fn(Uuid) -> Option<Decimal>) -> Result<Decimal, ValidationErrors> {
  let mut errors = ValidationErrors::new();
  let mut total = Some(Decimal::ZERO);
  for &product_id in product_ids {
    match price_of(product_id) {
      Some(price) => total = total.and_then(|sum| sum.checked_add(price)),
      None => unknown_product(&mut errors, product_id),
    }
  }
  errors.into_result()?;

  let Some(total) = total else {
    return Err(ValidationErrors::single("total", "is too large"));
  };

  if total < Decimal::ZERO {
    return Err(ValidationErrors::single("total", "must be greater than or equal to 0"));
  }
  Ok(total)
}

/// Expands a set of distinct product rows into one entry per requested id,
/// keeping request order and duplicates.
pub fn products_in_request_order(product_ids: &[Uuid], rows: &[Product]) -> Result<Vec<Product>, ValidationErrors> {
  let by_id: HashMap<Uuid, &Product> = rows.iter().map(|p| (p.id, p)).collect();
  let mut errors = ValidationErrors::new();
  let mut ordered = Vec::with_capacity(product_ids.len());
  for product_id in product_ids {
    match by_id.get(product_id) {
      Some(product) => ordered.push((*product).clone()),
      None => unknown_product(&mut errors, *product_id),
    }
  }
  errors.into_result()?;
  Ok(ordered)
}
