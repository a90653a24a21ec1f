// attire/src/store/users.rs

//! User lookups plus the two mutations whose side effects this core owns
//! (rename and image change propagate into reviews). Account creation and
//! authentication belong to the auth service in front of us.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::error::{Error, Result};
use crate::models::{Image, User};

#[derive(Clone)]
pub struct PgUserStore {
  pool: PgPool,
}

const USER_COLUMNS: &str =
  "id, name, email, role, image_key, image_url, created_at, updated_at";

impl PgUserStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn set_name(&self, id: Uuid, name: &str) -> Result<User> {
    let sql = format!(
      "UPDATE users SET name = $2, updated_at = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
      .bind(id)
      .bind(name)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("user", id))
  }

  pub async fn set_image(&self, id: Uuid, image: &Image) -> Result<User> {
    let sql = format!(
      "UPDATE users SET image_key = $2, image_url = $3, updated_at = $4 \
       WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
      .bind(id)
      .bind(&image.key)
      .bind(&image.url)
      .bind(Utc::now())
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| Error::not_found("user", id))
  }
}

#[async_trait]
impl UserStore for PgUserStore {
  async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    Ok(
      sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?,
    )
  }
}
