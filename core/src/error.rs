// attire/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input. Terminal for the triggering request.
  #[error("Validation failed: {0}")]
  Validation(String),

  /// A referenced entity does not exist.
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  /// Duplicate unique field, already-at-target-status, already-reviewed.
  #[error("Conflict: {0}")]
  Conflict(String),

  /// Payment processor failure. Placement aborts on this before anything
  /// is persisted.
  #[error("Payment gateway failure: {source}")]
  Gateway {
    #[source]
    source: AnyhowError,
  },

  /// Object storage (image blob) failure.
  #[error("Object store failure: {source}")]
  ObjectStore {
    #[source]
    source: AnyhowError,
  },

  /// Store read/write failure.
  #[error("Storage failure: {0}")]
  Persistence(#[from] sqlx::Error),
}

impl Error {
  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    Error::NotFound {
      entity,
      id: id.to_string(),
    }
  }

  pub fn gateway(source: impl Into<AnyhowError>) -> Self {
    Error::Gateway {
      source: source.into(),
    }
  }
}

/// True when the store rejected a write on a unique index (duplicate
/// product name/slug, second review for the same line, ...).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
  match err {
    sqlx::Error::Database(db) => db.is_unique_violation(),
    _ => false,
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
