// attire/src/pricing.rs

//! Price derivation rules. Discounts outside the 5–15% window are not an
//! error, they are simply ignored (stored as 0).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

pub const DISCOUNT_MIN: i32 = 5;
pub const DISCOUNT_MAX: i32 = 15;

/// Clamp a requested discount to the allowed window: anything outside
/// [5, 15] becomes 0.
pub fn effective_discount(requested: i32) -> i32 {
  if (DISCOUNT_MIN..=DISCOUNT_MAX).contains(&requested) {
    requested
  } else {
    0
  }
}

/// Selling price for an original price and an already-clamped discount.
/// `price = original − discount%·original`, rounded to cents.
pub fn sale_price(original_price: Decimal, discount: i32) -> Decimal {
  if discount == 0 {
    return original_price;
  }
  let rebate = original_price * Decimal::from(discount) / Decimal::from(100);
  (original_price - rebate).round_dp(2)
}

/// Convert a major-unit amount to the smallest currency unit for cent-based
/// processors (×100, truncated).
pub fn minor_units(amount: Decimal) -> Result<i64> {
  (amount * Decimal::from(100))
    .trunc()
    .to_i64()
    .ok_or_else(|| Error::Validation("order total out of range".to_string()))
}
