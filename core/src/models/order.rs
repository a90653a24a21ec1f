// attire/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row, Type as SqlxType};
use uuid::Uuid;

use super::product::{Category, Gender, Product, Size};
use super::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Completed,
}

impl OrderStatus {
  /// Orders still moving through fulfilment cannot be deleted.
  pub fn is_deletable(self) -> bool {
    !matches!(self, OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
  pub country: String,
  pub city: String,
  pub house_number_or_name: String,
  pub phone: String,
  pub post_code: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  /// Line snapshots, in the order they were placed. Populated by the store
  /// from the order_lines table.
  pub products: Vec<OrderLine>,
  pub status: OrderStatus,
  /// Fixed at creation time; never recomputed from current catalog prices.
  pub total_cost: Decimal,
  pub payment_intent: String,
  pub client_secret: String,
  pub shipping_address: ShippingAddress,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Order {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
    Ok(Self {
      id: row.try_get("id")?,
      user_id: row.try_get("user_id")?,
      products: Vec::new(),
      status: row.try_get("status")?,
      total_cost: row.try_get("total_cost")?,
      payment_intent: row.try_get("payment_intent")?,
      client_secret: row.try_get("client_secret")?,
      shipping_address: ShippingAddress {
        country: row.try_get("country")?,
        city: row.try_get("city")?,
        house_number_or_name: row.try_get("house_number_or_name")?,
        phone: row.try_get("phone")?,
        post_code: row.try_get("post_code")?,
      },
      created_at: row.try_get("created_at")?,
      updated_at: row.try_get("updated_at")?,
    })
  }
}

/// A purchased line: a point-in-time snapshot of the product, owned by its
/// order. `product_uid` is generated at order creation and is the key that
/// ties a review to this exact purchase.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
  pub product_uid: Uuid,
  pub order_id: Uuid,
  pub line_no: i32,
  pub product_id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: String,
  pub image: Image,
  /// Copied from the product at order time; later catalog price changes
  /// must not alter it.
  pub price: Decimal,
  pub quantity: i32,
  pub color: String,
  pub size: Size,
  pub brand: String,
  pub category: Category,
  pub product_type: String,
  pub gender: Gender,
  pub ordered_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
    Ok(Self {
      product_uid: row.try_get("product_uid")?,
      order_id: row.try_get("order_id")?,
      line_no: row.try_get("line_no")?,
      product_id: row.try_get("product_id")?,
      name: row.try_get("name")?,
      slug: row.try_get("slug")?,
      description: row.try_get("description")?,
      image: Image {
        key: row.try_get("image_key")?,
        url: row.try_get("image_url")?,
      },
      price: row.try_get("price")?,
      quantity: row.try_get("quantity")?,
      color: row.try_get("color")?,
      size: row.try_get("size")?,
      brand: row.try_get("brand")?,
      category: row.try_get("category")?,
      product_type: row.try_get("product_type")?,
      gender: row.try_get("gender")?,
      ordered_at: row.try_get("ordered_at")?,
    })
  }
}

/// One cart entry as submitted by the buyer: which product, how many, and
/// the chosen attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct CartEntry {
  pub product_id: Uuid,
  pub quantity: i32,
  pub color: String,
  pub size: Size,
}

/// A line ready to be persisted. Everything except `product_uid` and
/// `line_no`, which the order store assigns during the create step.
#[derive(Debug, Clone)]
pub struct LineDraft {
  pub product_id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: String,
  pub image: Image,
  pub price: Decimal,
  pub quantity: i32,
  pub color: String,
  pub size: Size,
  pub brand: String,
  pub category: Category,
  pub product_type: String,
  pub gender: Gender,
}

impl LineDraft {
  /// Snapshot the current catalog state of `product` for this cart entry.
  pub fn snapshot(product: &Product, entry: &CartEntry) -> Self {
    Self {
      product_id: product.id,
      name: product.name.clone(),
      slug: product.slug.clone(),
      description: product.description.clone(),
      image: product.image.clone(),
      price: product.price,
      quantity: entry.quantity,
      color: entry.color.clone(),
      size: entry.size,
      brand: product.brand.clone(),
      category: product.category,
      product_type: product.product_type.clone(),
      gender: product.gender,
    }
  }
}

#[derive(Debug, Clone)]
pub struct OrderDraft {
  pub user_id: Uuid,
  pub lines: Vec<LineDraft>,
  pub total_cost: Decimal,
  pub payment_intent: String,
  pub client_secret: String,
  pub shipping_address: ShippingAddress,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_completed_orders_are_deletable() {
    assert!(!OrderStatus::Pending.is_deletable());
    assert!(!OrderStatus::Processing.is_deletable());
    assert!(!OrderStatus::Shipped.is_deletable());
    assert!(OrderStatus::Completed.is_deletable());
  }
}
