// attire-server/src/web/handlers/mod.rs

pub mod order_handlers;
pub mod product_handlers;
pub mod review_handlers;
pub mod user_handlers;

use crate::errors::AppError;
use attire::access::{self, Action};
use attire::models::Principal;

/// Reject the request unless the principal may perform the action.
pub(crate) fn require(principal: &Principal, action: Action) -> Result<(), AppError> {
  if access::permitted(principal, &action) {
    Ok(())
  } else {
    Err(AppError::Forbidden(format!(
      "{} may not perform this action",
      principal.email
    )))
  }
}
