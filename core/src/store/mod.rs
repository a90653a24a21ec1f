// attire/src/store/mod.rs

//! Persistence layer: one store per collection, Postgres-backed.
//!
//! The traits here are the seams the coordination layer (checkout,
//! reviewing, propagation) works against; they carry only the operations
//! that layer needs. The `Pg*` types implement them and additionally expose
//! the full paginated query surface used by the HTTP handlers. Tests supply
//! in-memory doubles for the traits.

pub mod catalog;
pub mod orders;
pub mod page;
pub mod reviews;
pub mod users;

pub use catalog::{PgCatalogStore, ProductKey, StockFilter};
pub use orders::PgOrderStore;
pub use page::{Page, Paged};
pub use reviews::PgReviewStore;
pub use users::PgUserStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Image, NewReview, Order, OrderDraft, Product, RatingSummary, Review, User};

#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>>;

  /// Atomically apply one sale of `quantity` units: `sales += quantity`,
  /// `in_stock -= quantity`, in a single statement. No stock floor here;
  /// callers own that trade-off.
  async fn record_sale(&self, product_id: Uuid, quantity: i32) -> Result<()>;

  /// Write fresh review aggregates, then reclassify the product's tier
  /// from the new rating and its current sales.
  async fn set_rating_and_tier(&self, product_id: Uuid, summary: RatingSummary) -> Result<()>;

  async fn remove(&self, product_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Persist the order and its lines in one transaction, assigning each
  /// line a fresh globally unique `product_uid` as part of this step.
  async fn create(&self, draft: OrderDraft) -> Result<Order>;

  async fn order_by_id(&self, id: Uuid) -> Result<Option<Order>>;

  /// Push a new catalog image into every order line referencing the
  /// product, across all orders. Returns the number of lines touched.
  async fn set_line_image(&self, product_id: Uuid, image: &Image) -> Result<u64>;

  /// How many historical order lines reference this product.
  async fn product_line_count(&self, product_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
  async fn insert(&self, draft: NewReview) -> Result<Review>;

  async fn review_by_id(&self, id: Uuid) -> Result<Option<Review>>;

  async fn review_by_product_uid(&self, product_uid: Uuid) -> Result<Option<Review>>;

  async fn update(&self, id: Uuid, review: &str, rating: i32) -> Result<Review>;

  /// Remove a review and return it (the caller still needs its product_id
  /// to trigger the aggregate recompute).
  async fn delete(&self, id: Uuid) -> Result<Review>;

  /// Full recompute over every review of the product: count plus mean
  /// rating. Zeroed when the product has no reviews.
  async fn rating_summary(&self, product_id: Uuid) -> Result<RatingSummary>;

  async fn set_user_name(&self, user_id: Uuid, name: &str) -> Result<u64>;

  async fn set_user_image(&self, user_id: Uuid, image: &Image) -> Result<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn user_by_id(&self, id: Uuid) -> Result<Option<User>>;
}
