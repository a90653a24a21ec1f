// attire-server/src/state.rs

use crate::config::AppConfig;
use attire::{
  Checkout, ObjectStore, PgCatalogStore, PgOrderStore, PgReviewStore, PgUserStore, Propagator,
  Reviewing,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub users: Arc<PgUserStore>,
  pub catalog: Arc<PgCatalogStore>,
  pub orders: Arc<PgOrderStore>,
  pub reviews: Arc<PgReviewStore>,
  pub blobs: Arc<dyn ObjectStore>,
  pub checkout: Arc<Checkout>,
  pub reviewing: Arc<Reviewing>,
  pub propagator: Arc<Propagator>,
  pub config: Arc<AppConfig>,
}
