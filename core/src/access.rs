// attire/src/access.rs

//! Capability checks as a pure function of the principal and the action —
//! no ambient role tables.

use uuid::Uuid;

use crate::models::{Principal, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  ManageCatalog,
  PlaceOrder,
  ViewAllOrders,
  ViewUserOrders { owner: Uuid },
  AdvanceOrderStatus,
  DeleteOrder,
  SubmitReview,
  EditReview { author: Uuid },
  EditProfile { owner: Uuid },
}

pub fn permitted(principal: &Principal, action: &Action) -> bool {
  use Action::*;
  match principal.role {
    Role::Admin => true,
    Role::Editor => matches!(
      action,
      ManageCatalog | ViewAllOrders | AdvanceOrderStatus | ViewUserOrders { .. }
    ),
    Role::User => match action {
      PlaceOrder | SubmitReview => true,
      ViewUserOrders { owner } => *owner == principal.id,
      EditReview { author } => *author == principal.id,
      EditProfile { owner } => *owner == principal.id,
      _ => false,
    },
    Role::Guest => false,
  }
}
