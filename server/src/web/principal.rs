// attire-server/src/web/principal.rs

//! Principal extraction. Token verification happens upstream (the auth
//! gateway in front of this service); what arrives here is a set of
//! trusted identity headers, which we only parse.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;
use attire::models::{Principal, Role};

const USER_ID_HEADER: &str = "x-user-id";
const USER_NAME_HEADER: &str = "x-user-name";
const USER_EMAIL_HEADER: &str = "x-user-email";
const USER_ROLE_HEADER: &str = "x-user-role";

fn header<'r>(req: &'r HttpRequest, name: &str) -> Option<&'r str> {
  req.headers().get(name).and_then(|value| value.to_str().ok())
}

fn parse_role(raw: &str) -> Option<Role> {
  match raw {
    "user" => Some(Role::User),
    "admin" => Some(Role::Admin),
    "editor" => Some(Role::Editor),
    "guest" => Some(Role::Guest),
    _ => None,
  }
}

fn extract(req: &HttpRequest) -> Result<Principal, AppError> {
  let id = header(req, USER_ID_HEADER)
    .and_then(|raw| Uuid::parse_str(raw).ok())
    .ok_or_else(|| AppError::Auth("missing or invalid user id".to_string()))?;
  let role = header(req, USER_ROLE_HEADER)
    .and_then(parse_role)
    .ok_or_else(|| AppError::Auth("missing or invalid user role".to_string()))?;

  Ok(Principal {
    id,
    name: header(req, USER_NAME_HEADER).unwrap_or_default().to_string(),
    email: header(req, USER_EMAIL_HEADER).unwrap_or_default().to_string(),
    role,
  })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(extract(req).map(AuthenticatedUser))
  }
}

/// Newtype so handlers take the principal as an extractor argument.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);
