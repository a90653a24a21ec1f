// attire/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row, Type as SqlxType};
use uuid::Uuid;

use super::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "user_role_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
  Editor,
  Guest,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub role: Role,
  pub image: Image,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for User {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
    Ok(Self {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
      email: row.try_get("email")?,
      role: row.try_get("role")?,
      image: Image {
        key: row.try_get("image_key")?,
        url: row.try_get("image_url")?,
      },
      created_at: row.try_get("created_at")?,
      updated_at: row.try_get("updated_at")?,
    })
  }
}

/// The authenticated caller, as established by the auth middleware in
/// front of this core. Trusted as-is; the core never re-verifies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub role: Role,
}
