// attire-server/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use attire::{
  CatalogStore, Checkout, MemoryObjectStore, MockGateway, ObjectStore, OrderStore, PaymentGateway,
  PgCatalogStore, PgOrderStore, PgReviewStore, PgUserStore, Propagator, ReviewStore, Reviewing,
  UserStore,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting attire storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
    tracing::error!(error = %e, "Database migration failed.");
    panic!("Migration error: {}", e);
  }

  // Stores
  let users = Arc::new(PgUserStore::new(db_pool.clone()));
  let catalog = Arc::new(PgCatalogStore::new(db_pool.clone()));
  let orders = Arc::new(PgOrderStore::new(db_pool.clone()));
  let reviews = Arc::new(PgReviewStore::new(db_pool.clone()));

  // Collaborator adapters. The simulated gateway stands in for the real
  // processor; swap the Arc to integrate one.
  let gateway: Arc<dyn PaymentGateway> = Arc::new(MockGateway::new());
  let blobs: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new(app_config.asset_base_url.clone()));

  // Coordination layer
  let propagator = Arc::new(Propagator::new(
    catalog.clone() as Arc<dyn CatalogStore>,
    orders.clone() as Arc<dyn OrderStore>,
    reviews.clone() as Arc<dyn ReviewStore>,
    blobs.clone(),
  ));
  let checkout = Arc::new(Checkout::new(
    users.clone() as Arc<dyn UserStore>,
    catalog.clone() as Arc<dyn CatalogStore>,
    orders.clone() as Arc<dyn OrderStore>,
    gateway,
  ));
  let reviewing = Arc::new(Reviewing::new(
    catalog.clone() as Arc<dyn CatalogStore>,
    orders.clone() as Arc<dyn OrderStore>,
    reviews.clone() as Arc<dyn ReviewStore>,
    propagator.clone(),
  ));

  let app_state = AppState {
    users,
    catalog,
    orders,
    reviews,
    blobs,
    checkout,
    reviewing,
    propagator,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
