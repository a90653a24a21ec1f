// attire-server/src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::require;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::principal::AuthenticatedUser;
use attire::access::Action;
use attire::models::{Image, NewReview};
use attire::store::{ReviewStore, UserStore};
use attire::{Error as CoreError, Paged};

#[derive(Debug, Deserialize)]
pub struct SubmitReviewBody {
  pub product_id: Uuid,
  pub order_id: Uuid,
  pub product_uid: Uuid,
  pub review: String,
  pub rating: i32,
  /// Already-uploaded reviewer photo, if any.
  #[serde(default)]
  pub product_image: Image,
}

/// The reviewer's name and image are snapshotted from their account here,
/// not accepted from the request body.
#[instrument(name = "handler::submit_review", skip_all, fields(user_id = %auth_user.0.id))]
pub async fn submit_review_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<SubmitReviewBody>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::SubmitReview)?;

  let user = app_state
    .users
    .user_by_id(auth_user.0.id)
    .await?
    .ok_or_else(|| CoreError::not_found("user", auth_user.0.id))?;

  let body = payload.into_inner();
  let review = app_state
    .reviewing
    .submit(NewReview {
      user_id: user.id,
      user_name: user.name,
      user_image: user.image,
      product_id: body.product_id,
      order_id: body.order_id,
      product_uid: body.product_uid,
      product_image: body.product_image,
      review: body.review,
      rating: body.rating,
    })
    .await?;

  Ok(HttpResponse::Created().json(json!({
    "message": "Reviewed successfully",
    "review": review,
  })))
}

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub product_id: Option<Uuid>,
}

pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ReviewListQuery>,
) -> Result<HttpResponse, AppError> {
  let page = attire::Page::new(query.page.unwrap_or(1), query.limit.unwrap_or(8));

  let paged = match query.product_id {
    Some(product_id) => {
      let items = app_state.reviews.reviews_by_product(product_id, &page).await?;
      let total = app_state.reviews.count_reviews_by_product(product_id).await?;
      Paged::assemble(items, &page, total)
    }
    None => {
      let items = app_state.reviews.reviews(&page).await?;
      let total = app_state.reviews.count_reviews().await?;
      Paged::assemble(items, &page, total)
    }
  };

  Ok(HttpResponse::Ok().json(paged))
}

#[derive(Debug, Deserialize)]
pub struct AmendReviewBody {
  pub review: String,
  pub rating: i32,
}

pub async fn amend_review_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<AmendReviewBody>,
) -> Result<HttpResponse, AppError> {
  let review_id = path.into_inner();
  let existing = app_state
    .reviews
    .review_by_id(review_id)
    .await?
    .ok_or_else(|| CoreError::not_found("review", review_id))?;
  require(&auth_user.0, Action::EditReview { author: existing.user_id })?;

  let updated = app_state
    .reviewing
    .amend(review_id, &payload.review, payload.rating)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Updated successfully",
    "review": updated,
  })))
}

pub async fn delete_review_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let review_id = path.into_inner();
  let existing = app_state
    .reviews
    .review_by_id(review_id)
    .await?
    .ok_or_else(|| CoreError::not_found("review", review_id))?;
  require(&auth_user.0, Action::EditReview { author: existing.user_id })?;

  app_state.reviewing.withdraw(review_id).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Deleted successfully"})))
}
