// attire/src/store/orders.rs

//! Order collection plus the order_lines table it owns. Lines live in
//! their own table (not embedded), so the "flattened line" queries of the
//! API are plain SQL instead of unwind pipelines.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::page::Page;
use super::OrderStore;
use crate::error::{Error, Result};
use crate::models::{Image, Order, OrderDraft, OrderLine, OrderStatus};

#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

const ORDER_COLUMNS: &str = "id, user_id, status, total_cost, payment_intent, client_secret, \
   country, city, house_number_or_name, phone, post_code, created_at, updated_at";

const LINE_COLUMNS: &str = "product_uid, order_id, line_no, product_id, name, slug, description, \
   image_key, image_url, price, quantity, color, size, brand, category, product_type, gender, \
   ordered_at";

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Attach lines to a batch of order rows, one query for the whole batch.
  async fn hydrate(&self, mut orders: Vec<Order>) -> Result<Vec<Order>> {
    if orders.is_empty() {
      return Ok(orders);
    }
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let sql = format!(
      "SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = ANY($1) ORDER BY order_id, line_no"
    );
    let lines = sqlx::query_as::<_, OrderLine>(&sql)
      .bind(&ids)
      .fetch_all(&self.pool)
      .await?;

    let mut by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
    for line in lines {
      by_order.entry(line.order_id).or_default().push(line);
    }
    for order in &mut orders {
      order.products = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
  }

  async fn hydrate_one(&self, order: Order) -> Result<Order> {
    let mut hydrated = self.hydrate(vec![order]).await?;
    Ok(hydrated.pop().expect("hydrate preserves its input"))
  }

  pub async fn orders(&self, page: &Page) -> Result<Vec<Order>> {
    let sql = format!(
      "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(&self.pool)
      .await?;
    self.hydrate(rows).await
  }

  pub async fn count_orders(&self) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn orders_by_user(&self, user_id: Uuid, page: &Page) -> Result<Vec<Order>> {
    let sql = format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 \
       ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
      .bind(user_id)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(&self.pool)
      .await?;
    self.hydrate(rows).await
  }

  pub async fn count_orders_by_user(&self, user_id: Uuid) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  /// Orders containing at least one line for the product.
  pub async fn orders_by_product(&self, product_id: Uuid, page: &Page) -> Result<Vec<Order>> {
    let sql = format!(
      "SELECT {ORDER_COLUMNS} FROM orders o \
       WHERE EXISTS (SELECT 1 FROM order_lines l WHERE l.order_id = o.id AND l.product_id = $1) \
       ORDER BY o.created_at DESC LIMIT $2 OFFSET $3"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
      .bind(product_id)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(&self.pool)
      .await?;
    self.hydrate(rows).await
  }

  pub async fn count_orders_by_product(&self, product_id: Uuid) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM orders o \
         WHERE EXISTS (SELECT 1 FROM order_lines l WHERE l.order_id = o.id AND l.product_id = $1)",
      )
      .bind(product_id)
      .fetch_one(&self.pool)
      .await?,
    )
  }

  // Flattened line listings: every purchased line as its own row.

  pub async fn lines(&self, page: &Page) -> Result<Vec<OrderLine>> {
    let sql = format!(
      "SELECT {LINE_COLUMNS} FROM order_lines ORDER BY ordered_at DESC, line_no LIMIT $1 OFFSET $2"
    );
    Ok(
      sqlx::query_as::<_, OrderLine>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_lines(&self) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_lines")
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn lines_by_order(&self, order_id: Uuid, page: &Page) -> Result<Vec<OrderLine>> {
    let sql = format!(
      "SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = $1 \
       ORDER BY line_no LIMIT $2 OFFSET $3"
    );
    Ok(
      sqlx::query_as::<_, OrderLine>(&sql)
        .bind(order_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_lines_by_order(&self, order_id: Uuid) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_lines WHERE order_id = $1")
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  pub async fn lines_by_user(&self, user_id: Uuid, page: &Page) -> Result<Vec<OrderLine>> {
    let sql = format!(
      "SELECT {cols} FROM order_lines l JOIN orders o ON o.id = l.order_id \
       WHERE o.user_id = $1 ORDER BY l.ordered_at DESC, l.line_no LIMIT $2 OFFSET $3",
      cols = qualified_line_columns()
    );
    Ok(
      sqlx::query_as::<_, OrderLine>(&sql)
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_lines_by_user(&self, user_id: Uuid) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM order_lines l JOIN orders o ON o.id = l.order_id WHERE o.user_id = $1",
      )
      .bind(user_id)
      .fetch_one(&self.pool)
      .await?,
    )
  }

  pub async fn lines_by_product(&self, product_id: Uuid, page: &Page) -> Result<Vec<OrderLine>> {
    let sql = format!(
      "SELECT {LINE_COLUMNS} FROM order_lines WHERE product_id = $1 \
       ORDER BY ordered_at DESC, line_no LIMIT $2 OFFSET $3"
    );
    Ok(
      sqlx::query_as::<_, OrderLine>(&sql)
        .bind(product_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?,
    )
  }

  pub async fn count_lines_by_product(&self, product_id: Uuid) -> Result<i64> {
    self.product_line_count(product_id).await
  }

  /// Plain status write. Rejecting a no-op transition is the caller
  /// layer's rule, not the store's.
  pub async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order> {
    let sql = format!(
      "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&sql)
      .bind(order_id)
      .bind(status)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("order", order_id))?;
    self.hydrate_one(order).await
  }

  pub async fn delete(&self, order_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(order_id)
      .execute(&self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(Error::not_found("order", order_id));
    }
    Ok(())
  }
}

fn qualified_line_columns() -> String {
  LINE_COLUMNS
    .split(", ")
    .map(|c| format!("l.{}", c.trim()))
    .collect::<Vec<_>>()
    .join(", ")
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn create(&self, draft: OrderDraft) -> Result<Order> {
    let order_id = Uuid::new_v4();
    let now = Utc::now();
    let mut tx = self.pool.begin().await?;

    let insert_order_sql = format!(
      "INSERT INTO orders \
         (id, user_id, total_cost, payment_intent, client_secret, \
          country, city, house_number_or_name, phone, post_code, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
       RETURNING {ORDER_COLUMNS}"
    );
    let mut order = sqlx::query_as::<_, Order>(&insert_order_sql)
      .bind(order_id)
      .bind(draft.user_id)
      .bind(draft.total_cost)
      .bind(&draft.payment_intent)
      .bind(&draft.client_secret)
      .bind(&draft.shipping_address.country)
      .bind(&draft.shipping_address.city)
      .bind(&draft.shipping_address.house_number_or_name)
      .bind(&draft.shipping_address.phone)
      .bind(draft.shipping_address.post_code)
      .bind(now)
      .fetch_one(&mut *tx)
      .await?;

    let insert_line_sql = format!(
      "INSERT INTO order_lines \
         (product_uid, order_id, line_no, product_id, name, slug, description, image_key, \
          image_url, price, quantity, color, size, brand, category, product_type, gender, \
          ordered_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
       RETURNING {LINE_COLUMNS}"
    );
    for (index, line) in draft.lines.iter().enumerate() {
      // Fresh uid per line, independent even for the same product twice.
      let product_uid = Uuid::new_v4();
      let inserted = sqlx::query_as::<_, OrderLine>(&insert_line_sql)
        .bind(product_uid)
        .bind(order_id)
        .bind(index as i32)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(&line.slug)
        .bind(&line.description)
        .bind(&line.image.key)
        .bind(&line.image.url)
        .bind(line.price)
        .bind(line.quantity)
        .bind(&line.color)
        .bind(line.size)
        .bind(&line.brand)
        .bind(line.category)
        .bind(&line.product_type)
        .bind(line.gender)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
      order.products.push(inserted);
    }

    tx.commit().await?;
    Ok(order)
  }

  async fn order_by_id(&self, id: Uuid) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    let row = sqlx::query_as::<_, Order>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    match row {
      Some(order) => Ok(Some(self.hydrate_one(order).await?)),
      None => Ok(None),
    }
  }

  async fn set_line_image(&self, product_id: Uuid, image: &Image) -> Result<u64> {
    let result = sqlx::query(
      "UPDATE order_lines SET image_key = $2, image_url = $3 WHERE product_id = $1",
    )
    .bind(product_id)
    .bind(&image.key)
    .bind(&image.url)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected())
  }

  async fn product_line_count(&self, product_id: Uuid) -> Result<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_lines WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?,
    )
  }
}
