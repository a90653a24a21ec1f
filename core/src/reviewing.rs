// attire/src/reviewing.rs

//! Review lifecycle around the store: only the buyer of an exact order
//! line may review it, at most once. Every change re-aggregates the
//! product's rating through the propagator.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{NewReview, Review};
use crate::propagate::Propagator;
use crate::store::{CatalogStore, OrderStore, ReviewStore};

pub const RATING_MAX: i32 = 5;

pub struct Reviewing {
  catalog: Arc<dyn CatalogStore>,
  orders: Arc<dyn OrderStore>,
  reviews: Arc<dyn ReviewStore>,
  propagator: Arc<Propagator>,
}

impl Reviewing {
  pub fn new(
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    reviews: Arc<dyn ReviewStore>,
    propagator: Arc<Propagator>,
  ) -> Self {
    Self {
      catalog,
      orders,
      reviews,
      propagator,
    }
  }

  // The schema only caps the rating; there is no lower bound.
  fn check_rating(rating: i32) -> Result<()> {
    if rating > RATING_MAX {
      return Err(Error::Validation(format!("rating may not exceed {RATING_MAX}")));
    }
    Ok(())
  }

  #[instrument(name = "reviewing::submit", skip(self, draft), fields(product_uid = %draft.product_uid))]
  pub async fn submit(&self, draft: NewReview) -> Result<Review> {
    Self::check_rating(draft.rating)?;

    self
      .catalog
      .product_by_id(draft.product_id)
      .await?
      .ok_or_else(|| Error::not_found("product", draft.product_id))?;

    let order = self
      .orders
      .order_by_id(draft.order_id)
      .await?
      .ok_or_else(|| Error::not_found("order", draft.order_id))?;

    // The uid must name a line of this exact order: that is the proof the
    // reviewer bought the thing being reviewed.
    if !order.products.iter().any(|line| line.product_uid == draft.product_uid) {
      return Err(Error::Validation(format!(
        "product_uid {} does not belong to order {}",
        draft.product_uid, draft.order_id
      )));
    }

    if self.reviews.review_by_product_uid(draft.product_uid).await?.is_some() {
      return Err(Error::Conflict("already reviewed".to_string()));
    }

    let product_id = draft.product_id;
    let review = self.reviews.insert(draft).await?;
    info!(review_id = %review.id, "review submitted");

    self.propagator.review_changed(product_id).await;
    Ok(review)
  }

  #[instrument(name = "reviewing::amend", skip(self, review), fields(review_id = %id))]
  pub async fn amend(&self, id: Uuid, review: &str, rating: i32) -> Result<Review> {
    Self::check_rating(rating)?;

    self
      .reviews
      .review_by_id(id)
      .await?
      .ok_or_else(|| Error::not_found("review", id))?;

    let updated = self.reviews.update(id, review, rating).await?;
    self.propagator.review_changed(updated.product_id).await;
    Ok(updated)
  }

  #[instrument(name = "reviewing::withdraw", skip(self), fields(review_id = %id))]
  pub async fn withdraw(&self, id: Uuid) -> Result<Review> {
    let removed = self.reviews.delete(id).await?;
    // Aggregates follow the deletion, down to zero if it was the last one.
    self.propagator.review_changed(removed.product_id).await;
    Ok(removed)
  }
}
