// attire/src/store/reviews.rs

//! Review collection. The unique index on product_uid is what ultimately
//! backs "one review per purchased line".

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::page::Page;
use super::ReviewStore;
use crate::error::{is_unique_violation, Error, Result};
use crate::models::{Image, NewReview, RatingSummary, Review};

#[derive(Clone)]
pub struct PgReviewStore {
  pool: PgPool,
}

const REVIEW_COLUMNS: &str = "id, user_id, user_name, user_image_key, user_image_url, product_id, \
   order_id, product_uid, product_image_key, product_image_url, review, rating, created_at, \
   updated_at";

impl PgReviewStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn reviews(&self, page: &Page) -> Result<Vec<Review>> {
    let sql = format!(
      "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    );
    Ok(
      sqlx::query_as::<_, Review>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_reviews(&self) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn reviews_by_product(&self, product_id: Uuid, page: &Page) -> Result<Vec<Review>> {
    let sql = format!(
      "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 \
       ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    Ok(
      sqlx::query_as::<_, Review>(&sql)
        .bind(product_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_reviews_by_product(&self, product_id: Uuid) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?,
    )
  }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
  async fn insert(&self, draft: NewReview) -> Result<Review> {
    let sql = format!(
      "INSERT INTO reviews \
         (id, user_id, user_name, user_image_key, user_image_url, product_id, order_id, \
          product_uid, product_image_key, product_image_url, review, rating) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
       RETURNING {REVIEW_COLUMNS}"
    );
    sqlx::query_as::<_, Review>(&sql)
      .bind(Uuid::new_v4())
      .bind(draft.user_id)
      .bind(&draft.user_name)
      .bind(&draft.user_image.key)
      .bind(&draft.user_image.url)
      .bind(draft.product_id)
      .bind(draft.order_id)
      .bind(draft.product_uid)
      .bind(&draft.product_image.key)
      .bind(&draft.product_image.url)
      .bind(&draft.review)
      .bind(draft.rating)
      .fetch_one(&self.pool)
      .await
      .map_err(|err| {
        if is_unique_violation(&err) {
          Error::Conflict("already reviewed".to_string())
        } else {
          Error::Persistence(err)
        }
      })
  }

  async fn review_by_id(&self, id: Uuid) -> Result<Option<Review>> {
    let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
    Ok(
      sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn review_by_product_uid(&self, product_uid: Uuid) -> Result<Option<Review>> {
    let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_uid = $1");
    Ok(
      sqlx::query_as::<_, Review>(&sql)
        .bind(product_uid)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn update(&self, id: Uuid, review: &str, rating: i32) -> Result<Review> {
    let sql = format!(
      "UPDATE reviews SET review = $2, rating = $3, updated_at = $4 \
       WHERE id = $1 RETURNING {REVIEW_COLUMNS}"
    );
    sqlx::query_as::<_, Review>(&sql)
      .bind(id)
      .bind(review)
      .bind(rating)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("review", id))
  }

  async fn delete(&self, id: Uuid) -> Result<Review> {
    let sql = format!("DELETE FROM reviews WHERE id = $1 RETURNING {REVIEW_COLUMNS}");
    sqlx::query_as::<_, Review>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("review", id))
  }

  async fn rating_summary(&self, product_id: Uuid) -> Result<RatingSummary> {
    let row: PgRow = sqlx::query(
      "SELECT COUNT(*)::bigint AS total_reviews, AVG(rating)::float8 AS average_rating \
       FROM reviews WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_one(&self.pool)
    .await?;

    let total: i64 = row.try_get("total_reviews")?;
    let average: Option<f64> = row.try_get("average_rating")?;
    Ok(RatingSummary {
      total_reviews: total as i32,
      average_rating: average.unwrap_or(0.0),
    })
  }

  async fn set_user_name(&self, user_id: Uuid, name: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE reviews SET user_name = $2 WHERE user_id = $1")
      .bind(user_id)
      .bind(name)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn set_user_image(&self, user_id: Uuid, image: &Image) -> Result<u64> {
    let result =
      sqlx::query("UPDATE reviews SET user_image_key = $2, user_image_url = $3 WHERE user_id = $1")
        .bind(user_id)
        .bind(&image.key)
        .bind(&image.url)
        .execute(&self.pool)
        .await?;
    Ok(result.rows_affected())
  }
}
