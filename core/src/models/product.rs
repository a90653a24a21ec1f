// attire/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row, Type as SqlxType};
use uuid::Uuid;

use super::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "product_category_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Men,
  Women,
  Boy,
  Girl,
  Sports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "product_gender_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Man,
  Woman,
  Unisex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "product_size_enum")]
pub enum Size {
  S,
  M,
  L,
  XL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "product_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
  Active,
  Inactive,
}

/// Derived marketing tier. Recomputed whenever the rating aggregates are
/// pushed back into the catalog; never set directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "top_category_enum")]
pub enum TopCategory {
  Regular,
  Bestseller,
  #[sqlx(rename = "Highest rated")]
  #[serde(rename = "Highest rated")]
  HighestRated,
  Featured,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: String,
  pub image: Image,
  pub original_price: Decimal,
  /// Selling price derived from `original_price` and `discount`; fixed by
  /// the store on every write that touches either input.
  pub price: Decimal,
  pub discount: i32,
  pub in_stock: i32,
  pub colors: Vec<String>,
  pub sizes: Vec<Size>,
  pub brand: String,
  pub category: Category,
  pub product_type: String,
  pub gender: Gender,
  pub status: ProductStatus,
  pub average_rating: f64,
  pub total_reviews: i32,
  pub sales: i32,
  pub top_category: TopCategory,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Product {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
    Ok(Self {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
      slug: row.try_get("slug")?,
      description: row.try_get("description")?,
      image: Image {
        key: row.try_get("image_key")?,
        url: row.try_get("image_url")?,
      },
      original_price: row.try_get("original_price")?,
      price: row.try_get("price")?,
      discount: row.try_get("discount")?,
      in_stock: row.try_get("in_stock")?,
      colors: row.try_get("colors")?,
      sizes: row.try_get("sizes")?,
      brand: row.try_get("brand")?,
      category: row.try_get("category")?,
      product_type: row.try_get("product_type")?,
      gender: row.try_get("gender")?,
      status: row.try_get("status")?,
      average_rating: row.try_get("average_rating")?,
      total_reviews: row.try_get("total_reviews")?,
      sales: row.try_get("sales")?,
      top_category: row.try_get("top_category")?,
      created_at: row.try_get("created_at")?,
      updated_at: row.try_get("updated_at")?,
    })
  }
}

/// Create payload for a catalog product. `price`, rating aggregates and
/// the tier are derived by the store, not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub name: String,
  pub slug: String,
  pub description: String,
  #[serde(default)]
  pub image: Image,
  pub original_price: Decimal,
  #[serde(default)]
  pub discount: i32,
  pub in_stock: i32,
  pub colors: Vec<String>,
  pub sizes: Vec<Size>,
  pub brand: String,
  pub category: Category,
  pub product_type: String,
  pub gender: Gender,
}
