// attire-server/src/web/handlers/user_handlers.rs

//! The two profile mutations whose side effects the core owns: a rename
//! and an avatar change both fan out into the user's reviews.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::require;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::principal::AuthenticatedUser;
use attire::access::Action;
use attire::store::UserStore;
use attire::{Error as CoreError, ObjectStore};

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub name: String,
}

#[instrument(name = "handler::rename_user", skip_all, fields(user_id = %path))]
pub async fn rename_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<RenameBody>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  require(&auth_user.0, Action::EditProfile { owner: user_id })?;

  let current = app_state
    .users
    .user_by_id(user_id)
    .await?
    .ok_or_else(|| CoreError::not_found("user", user_id))?;

  // Propagation only fires when the name actually changed.
  if current.name == payload.name {
    return Ok(HttpResponse::Ok().json(json!({
      "message": "Nothing to update",
      "user": current,
    })));
  }

  let updated = app_state.users.set_name(user_id, &payload.name).await?;
  app_state.propagator.user_renamed(user_id, &updated.name).await;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Updated successfully",
    "user": updated,
  })))
}

#[instrument(name = "handler::update_user_image", skip_all, fields(user_id = %path))]
pub async fn update_user_image_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  body: web::Bytes,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  require(&auth_user.0, Action::EditProfile { owner: user_id })?;

  let current = app_state
    .users
    .user_by_id(user_id)
    .await?
    .ok_or_else(|| CoreError::not_found("user", user_id))?;

  let content_type = req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .unwrap_or("application/octet-stream");

  let image = app_state.blobs.put(body.to_vec(), content_type).await?;
  let updated = app_state.users.set_image(user_id, &image).await?;

  if !current.image.is_empty() {
    if let Err(err) = app_state.blobs.delete(&current.image.key).await {
      tracing::warn!(key = %current.image.key, error = %err, "stale avatar blob removal failed");
    }
  }

  app_state.propagator.user_image_changed(user_id, &image).await;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Image updated successfully",
    "user": updated,
  })))
}
