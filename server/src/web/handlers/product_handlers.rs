// attire-server/src/web/handlers/product_handlers.rs

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
use attire::models::{NewProduct, ProductStatus, TopCategory};
use attire::{Error as CoreError, ObjectStore, Paged, ProductKey, StockFilter};

#[instrument(name = "handler::create_product", skip_all)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ManageCatalog)?;

  let product = app_state.catalog.create(payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({
    "message": "Product created successfully",
    "product": product,
  })))
}

/// Path accepts a product id or, failing the uuid parse, a slug with an
/// exact-name fallback.
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw = path.into_inner();

  let found = match Uuid::parse_str(&raw) {
    Ok(id) => app_state.catalog.product_by_key(&ProductKey::Id(id)).await?,
    Err(_) => {
      match app_state
        .catalog
        .product_by_key(&ProductKey::Slug(raw.clone()))
        .await?
      {
        Some(product) => Some(product),
        None => {
          app_state
            .catalog
            .product_by_key(&ProductKey::Name(raw.clone()))
            .await?
        }
      }
    }
  };

  let product = found.ok_or_else(|| CoreError::not_found("product", raw))?;
  Ok(HttpResponse::Ok().json(product))
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub top_category: Option<TopCategory>,
  pub status: Option<ProductStatus>,
  pub stock: Option<String>,
  pub discounted: Option<bool>,
}

pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let page = attire::Page::new(query.page.unwrap_or(1), query.limit.unwrap_or(8));
  let catalog = &app_state.catalog;

  let paged = if let Some(top) = query.top_category {
    let items = catalog.products_by_top_category(top, &page).await?;
    let total = catalog.count_by_top_category(top).await?;
    Paged::assemble(items, &page, total)
  } else if let Some(status) = query.status {
    let items = catalog.products_by_status(status, &page).await?;
    let total = catalog.count_by_status(status).await?;
    Paged::assemble(items, &page, total)
  } else if let Some(stock) = query.stock.as_deref() {
    let filter = match stock {
      "in_stock" => StockFilter::InStock,
      "out_of_stock" => StockFilter::OutOfStock,
      other => {
        return Err(
          CoreError::Validation(format!("unknown stock filter: {other}")).into(),
        )
      }
    };
    let items = catalog.products_by_stock(filter, &page).await?;
    let total = catalog.count_by_stock(filter).await?;
    Paged::assemble(items, &page, total)
  } else if query.discounted == Some(true) {
    let items = catalog.discounted_products(&page).await?;
    let total = catalog.count_discounted().await?;
    Paged::assemble(items, &page, total)
  } else {
    let items = catalog.products(&page).await?;
    let total = catalog.count_products().await?;
    Paged::assemble(items, &page, total)
  };

  Ok(HttpResponse::Ok().json(paged))
}

/// Raw image bytes in, new catalog image out. The fresh key/url is then
/// pushed into every historical order line for this product.
#[instrument(name = "handler::update_product_image", skip_all, fields(product_id = %path))]
pub async fn update_product_image_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  body: web::Bytes,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ManageCatalog)?;
  let product_id = path.into_inner();

  let previous = app_state
    .catalog
    .product_by_key(&ProductKey::Id(product_id))
    .await?
    .ok_or_else(|| CoreError::not_found("product", product_id))?;

  let content_type = req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .unwrap_or("application/octet-stream");

  let image = app_state.blobs.put(body.to_vec(), content_type).await?;
  let product = app_state.catalog.set_image(product_id, &image).await?;

  if !previous.image.is_empty() {
    if let Err(err) = app_state.blobs.delete(&previous.image.key).await {
      tracing::warn!(key = %previous.image.key, error = %err, "stale image blob removal failed");
    }
  }

  app_state
    .propagator
    .product_image_changed(product_id, &image)
    .await;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Image updated successfully",
    "product": product,
  })))
}

#[derive(Debug, Deserialize)]
pub struct ProductStatusBody {
  pub status: ProductStatus,
}

pub async fn update_product_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<ProductStatusBody>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ManageCatalog)?;

  let product = app_state
    .catalog
    .set_status(path.into_inner(), payload.status)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Status updated successfully",
    "product": product,
  })))
}

#[derive(Debug, Deserialize)]
pub struct ProductDiscountBody {
  pub discount: i32,
}

pub async fn update_product_discount_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<ProductDiscountBody>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ManageCatalog)?;

  let product = app_state
    .catalog
    .set_discount(path.into_inner(), payload.discount)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Discount updated successfully",
    "product": product,
  })))
}

pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ManageCatalog)?;

  app_state.propagator.delete_product(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Deleted successfully"})))
}

#[derive(Debug, Deserialize)]
pub struct ProductStockBody {
  pub in_stock: i32,
}

pub async fn update_product_stock_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<ProductStockBody>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ManageCatalog)?;

  let product = app_state
    .catalog
    .set_stock(path.into_inner(), payload.in_stock)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Stock updated successfully",
    "product": product,
  })))
}
