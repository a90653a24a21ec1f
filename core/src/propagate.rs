// attire/src/propagate.rs

//! Consistency propagation: pushes denormalized copies around after their
//! source changes. These fan-outs are logged-only on failure — they never
//! block or roll back the mutation that triggered them.

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::blobs::ObjectStore;
use crate::error::{Error, Result};
use crate::models::Image;
use crate::store::{CatalogStore, OrderStore, ReviewStore};

pub struct Propagator {
  catalog: Arc<dyn CatalogStore>,
  orders: Arc<dyn OrderStore>,
  reviews: Arc<dyn ReviewStore>,
  blobs: Arc<dyn ObjectStore>,
}

impl Propagator {
  pub fn new(
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    reviews: Arc<dyn ReviewStore>,
    blobs: Arc<dyn ObjectStore>,
  ) -> Self {
    Self {
      catalog,
      orders,
      reviews,
      blobs,
    }
  }

  /// A product's catalog image changed: push the new key/url into every
  /// order line referencing it, across all orders. Reviews are left alone —
  /// a reviewer's photo is theirs, not the catalog's.
  #[instrument(skip(self, image), fields(product_id = %product_id))]
  pub async fn product_image_changed(&self, product_id: Uuid, image: &Image) {
    match self.orders.set_line_image(product_id, image).await {
      Ok(touched) => debug!(touched, "propagated product image into order lines"),
      Err(err) => warn!(error = %err, "order-line image propagation failed"),
    }
  }

  /// Caller is expected to invoke this only when the name actually changed.
  #[instrument(skip(self, name), fields(user_id = %user_id))]
  pub async fn user_renamed(&self, user_id: Uuid, name: &str) {
    match self.reviews.set_user_name(user_id, name).await {
      Ok(touched) => debug!(touched, "propagated user name into reviews"),
      Err(err) => warn!(error = %err, "review user-name propagation failed"),
    }
  }

  #[instrument(skip(self, image), fields(user_id = %user_id))]
  pub async fn user_image_changed(&self, user_id: Uuid, image: &Image) {
    match self.reviews.set_user_image(user_id, image).await {
      Ok(touched) => debug!(touched, "propagated user image into reviews"),
      Err(err) => warn!(error = %err, "review user-image propagation failed"),
    }
  }

  /// A review was created, edited, or deleted: recompute the product's
  /// aggregates from every review it has (full recompute, not a running
  /// average) and push them — with the re-derived tier — into the catalog.
  #[instrument(skip(self), fields(product_id = %product_id))]
  pub async fn review_changed(&self, product_id: Uuid) {
    let summary = match self.reviews.rating_summary(product_id).await {
      Ok(summary) => summary,
      Err(err) => {
        warn!(error = %err, "rating recompute failed");
        return;
      }
    };
    if let Err(err) = self.catalog.set_rating_and_tier(product_id, summary).await {
      warn!(error = %err, "rating/tier push into catalog failed");
    }
  }

  /// Delete a product. Its image blob is only removed when no historical
  /// order line still references the product; otherwise the blob stays so
  /// old order snapshots keep a working image link.
  #[instrument(skip(self), fields(product_id = %product_id))]
  pub async fn delete_product(&self, product_id: Uuid) -> Result<()> {
    let product = self
      .catalog
      .product_by_id(product_id)
      .await?
      .ok_or_else(|| Error::not_found("product", product_id))?;

    let referenced = self.orders.product_line_count(product_id).await? > 0;
    if !referenced && !product.image.is_empty() {
      if let Err(err) = self.blobs.delete(&product.image.key).await {
        warn!(key = %product.image.key, error = %err, "image blob removal failed");
      }
    }

    self.catalog.remove(product_id).await
  }
}
