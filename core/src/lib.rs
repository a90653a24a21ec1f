// src/lib.rs

//! Attire core: the order-placement and derived-state consistency
//! subsystem of the storefront backend.
//!
//! What lives here:
//!  - The catalog, order, review, and user stores (Postgres-backed), with
//!    the store traits the coordination layer works against.
//!  - The order placement orchestrator (`checkout`): cart validation,
//!    point-in-time line snapshots, payment-intent creation, transactional
//!    persistence, best-effort stock decrement.
//!  - The review flow (`reviewing`): buyers-only, one review per line.
//!  - The consistency propagator (`propagate`): pushes denormalized
//!    images/names into historical orders and reviews, and recomputed
//!    rating aggregates plus the derived tier back into the catalog.
//!  - The payment-gateway and object-store seams with their local
//!    implementations.
//!
//! The HTTP layer, request validation, and authentication live in the
//! server crate; this crate receives already-typed input and an
//! already-authenticated principal.

pub mod access;
pub mod blobs;
pub mod checkout;
pub mod error;
pub mod models;
pub mod payment;
pub mod pricing;
pub mod propagate;
pub mod reviewing;
pub mod store;
pub mod tier;

// --- Re-exports for the public API ---

pub use crate::checkout::Checkout;
pub use crate::error::{Error, Result};
pub use crate::propagate::Propagator;
pub use crate::reviewing::Reviewing;

pub use crate::blobs::{MemoryObjectStore, ObjectStore};
pub use crate::payment::{MockGateway, PaymentGateway, PaymentIntent};
pub use crate::store::{
  CatalogStore, OrderStore, Page, Paged, PgCatalogStore, PgOrderStore, PgReviewStore, PgUserStore,
  ProductKey, ReviewStore, StockFilter, UserStore,
};
