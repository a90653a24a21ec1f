// attire/src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::Image;

/// One review per purchased line. `product_uid` ties the review to the
/// exact order line being reviewed and is unique across all reviews.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
  pub id: Uuid,
  pub user_id: Uuid,
  pub user_name: String,
  pub user_image: Image,
  pub product_id: Uuid,
  pub order_id: Uuid,
  pub product_uid: Uuid,
  /// Reviewer-supplied photo, independent of the catalog image. Empty when
  /// the reviewer did not attach one.
  pub product_image: Image,
  pub review: String,
  pub rating: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Review {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
    Ok(Self {
      id: row.try_get("id")?,
      user_id: row.try_get("user_id")?,
      user_name: row.try_get("user_name")?,
      user_image: Image {
        key: row.try_get("user_image_key")?,
        url: row.try_get("user_image_url")?,
      },
      product_id: row.try_get("product_id")?,
      order_id: row.try_get("order_id")?,
      product_uid: row.try_get("product_uid")?,
      product_image: Image {
        key: row.try_get("product_image_key")?,
        url: row.try_get("product_image_url")?,
      },
      review: row.try_get("review")?,
      rating: row.try_get("rating")?,
      created_at: row.try_get("created_at")?,
      updated_at: row.try_get("updated_at")?,
    })
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
  pub user_id: Uuid,
  pub user_name: String,
  pub user_image: Image,
  pub product_id: Uuid,
  pub order_id: Uuid,
  pub product_uid: Uuid,
  #[serde(default)]
  pub product_image: Image,
  pub review: String,
  pub rating: i32,
}

/// Aggregate over all reviews of one product, recomputed from source on
/// every review change rather than maintained incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
  pub total_reviews: i32,
  pub average_rating: f64,
}

impl RatingSummary {
  pub fn empty() -> Self {
    Self {
      total_reviews: 0,
      average_rating: 0.0,
    }
  }
}
