// attire/src/store/catalog.rs

//! Product collection. Owns price derivation, stock/sales counters, and
//! the derived rating/tier fields.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::page::Page;
use super::CatalogStore;
use crate::error::{is_unique_violation, Error, Result};
use crate::models::{Image, NewProduct, Product, ProductStatus, RatingSummary, TopCategory};
use crate::{pricing, tier};

/// Lookup key for a single product: the API accepts an id, a slug, or an
/// exact name.
#[derive(Debug, Clone)]
pub enum ProductKey {
  Id(Uuid),
  Slug(String),
  Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockFilter {
  InStock,
  OutOfStock,
}

#[derive(Clone)]
pub struct PgCatalogStore {
  pool: PgPool,
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, image_key, image_url, original_price, price, \
   discount, in_stock, colors, sizes, brand, category, product_type, gender, status, \
   average_rating, total_reviews, sales, top_category, created_at, updated_at";

impl PgCatalogStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Insert a new product. The discount is clamped to the allowed window
  /// and the selling price derived here; duplicate name/slug surfaces as
  /// a Conflict.
  pub async fn create(&self, data: NewProduct) -> Result<Product> {
    let discount = pricing::effective_discount(data.discount);
    let price = pricing::sale_price(data.original_price, discount);

    let sql = format!(
      "INSERT INTO products \
         (id, name, slug, description, image_key, image_url, original_price, price, discount, \
          in_stock, colors, sizes, brand, category, product_type, gender) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
       RETURNING {PRODUCT_COLUMNS}"
    );
    let inserted = sqlx::query_as::<_, Product>(&sql)
      .bind(Uuid::new_v4())
      .bind(&data.name)
      .bind(&data.slug)
      .bind(&data.description)
      .bind(&data.image.key)
      .bind(&data.image.url)
      .bind(data.original_price)
      .bind(price)
      .bind(discount)
      .bind(data.in_stock)
      .bind(&data.colors)
      .bind(&data.sizes)
      .bind(&data.brand)
      .bind(data.category)
      .bind(&data.product_type)
      .bind(data.gender)
      .fetch_one(&self.pool)
      .await
      .map_err(|err| {
        if is_unique_violation(&err) {
          Error::Conflict(format!("product name or slug already in use: {}", data.name))
        } else {
          Error::Persistence(err)
        }
      })?;

    Ok(inserted)
  }

  pub async fn product_by_key(&self, key: &ProductKey) -> Result<Option<Product>> {
    let column = match key {
      ProductKey::Id(_) => "id",
      ProductKey::Slug(_) => "slug",
      ProductKey::Name(_) => "name",
    };
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE {column} = $1");
    let query = sqlx::query_as::<_, Product>(&sql);
    let query = match key {
      ProductKey::Id(id) => query.bind(*id),
      ProductKey::Slug(slug) => query.bind(slug.clone()),
      ProductKey::Name(name) => query.bind(name.clone()),
    };
    Ok(query.fetch_optional(&self.pool).await?)
  }

  pub async fn products(&self, page: &Page) -> Result<Vec<Product>> {
    let sql = format!(
      "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    );
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_products(&self) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn products_by_status(&self, status: ProductStatus, page: &Page) -> Result<Vec<Product>> {
    let sql = format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE status = $1 \
       ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_by_status(&self, status: ProductStatus) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE status = $1")
        .bind(status)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn products_by_stock(&self, filter: StockFilter, page: &Page) -> Result<Vec<Product>> {
    let cmp = match filter {
      StockFilter::InStock => ">=",
      StockFilter::OutOfStock => "<",
    };
    let sql = format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE in_stock {cmp} 1 \
       ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    );
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_by_stock(&self, filter: StockFilter) -> Result<i64> {
    let cmp = match filter {
      StockFilter::InStock => ">=",
      StockFilter::OutOfStock => "<",
    };
    let sql = format!("SELECT COUNT(*) FROM products WHERE in_stock {cmp} 1");
    Ok(sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await?)
  }

  /// Products currently carrying a discount (the window floor is 5, so
  /// `>= 5` is equivalent to "discounted").
  pub async fn discounted_products(&self, page: &Page) -> Result<Vec<Product>> {
    let sql = format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE discount >= $1 \
       ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(pricing::DISCOUNT_MIN)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_discounted(&self) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE discount >= $1")
        .bind(pricing::DISCOUNT_MIN)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  /// Storefront tier listing: only active products with stock remaining.
  pub async fn products_by_top_category(&self, top: TopCategory, page: &Page) -> Result<Vec<Product>> {
    let sql = format!(
      "SELECT {PRODUCT_COLUMNS} FROM products \
       WHERE top_category = $1 AND in_stock >= 1 AND status = 'active' \
       ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(top)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_by_top_category(&self, top: TopCategory) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE top_category = $1")
        .bind(top)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn set_image(&self, id: Uuid, image: &Image) -> Result<Product> {
    let sql = format!(
      "UPDATE products SET image_key = $2, image_url = $3, updated_at = $4 \
       WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(&image.key)
      .bind(&image.url)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("product", id))
  }

  pub async fn set_status(&self, id: Uuid, status: ProductStatus) -> Result<Product> {
    let sql = format!(
      "UPDATE products SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(status)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("product", id))
  }

  pub async fn set_stock(&self, id: Uuid, in_stock: i32) -> Result<Product> {
    let sql = format!(
      "UPDATE products SET in_stock = $2, updated_at = $3 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(in_stock)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("product", id))
  }

  /// Change the discount, re-deriving the selling price from the stored
  /// original price so the price invariant holds after the write.
  pub async fn set_discount(&self, id: Uuid, requested_discount: i32) -> Result<Product> {
    let discount = pricing::effective_discount(requested_discount);
    let original_price = sqlx::query_scalar::<_, rust_decimal::Decimal>(
      "SELECT original_price FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::not_found("product", id))?;

    let price = pricing::sale_price(original_price, discount);
    let sql = format!(
      "UPDATE products SET discount = $2, price = $3, updated_at = $4 \
       WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(discount)
      .bind(price)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("product", id))
  }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
  async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
    self.product_by_key(&ProductKey::Id(id)).await
  }

  async fn record_sale(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    let result = sqlx::query(
      "UPDATE products SET sales = sales + $2, in_stock = in_stock - $2, updated_at = $3 \
       WHERE id = $1",
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(Error::not_found("product", product_id));
    }
    Ok(())
  }

  async fn set_rating_and_tier(&self, product_id: Uuid, summary: RatingSummary) -> Result<()> {
    let sales = sqlx::query_scalar::<_, i32>(
      "UPDATE products SET total_reviews = $2, average_rating = $3, updated_at = $4 \
       WHERE id = $1 RETURNING sales",
    )
    .bind(product_id)
    .bind(summary.total_reviews)
    .bind(summary.average_rating)
    .bind(Utc::now())
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::not_found("product", product_id))?;

    let top = tier::classify(summary.average_rating, sales);
    sqlx::query("UPDATE products SET top_category = $2 WHERE id = $1")
      .bind(product_id)
      .bind(top)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn remove(&self, product_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(Error::not_found("product", product_id));
    }
    Ok(())
  }
}
