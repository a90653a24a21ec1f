// attire-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::require;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::principal::AuthenticatedUser;
use crate::web::PageQuery;
use attire::access::Action;
use attire::models::{CartEntry, OrderStatus, ShippingAddress};
use attire::store::{OrderStore, UserStore};
use attire::{Error as CoreError, Paged};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderBody {
  pub products: Vec<CartEntry>,
  pub shipping_address: ShippingAddress,
}

#[instrument(name = "handler::place_order", skip_all, fields(user_id = %auth_user.0.id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<PlaceOrderBody>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::PlaceOrder)?;

  let body = payload.into_inner();
  let order = app_state
    .checkout
    .place_order(auth_user.0.id, body.products, body.shipping_address)
    .await?;

  Ok(HttpResponse::Created().json(json!({
    "message": "Placed order successfully",
    "order": order,
  })))
}

pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ViewAllOrders)?;

  let page = query.to_page();
  let items = app_state.orders.orders(&page).await?;
  let total = app_state.orders.count_orders().await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

pub async fn orders_by_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  require(&auth_user.0, Action::ViewUserOrders { owner: user_id })?;

  app_state
    .users
    .user_by_id(user_id)
    .await?
    .ok_or_else(|| CoreError::not_found("user", user_id))?;

  let page = query.to_page();
  let items = app_state.orders.orders_by_user(user_id, &page).await?;
  let total = app_state.orders.count_orders_by_user(user_id).await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

pub async fn orders_by_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ViewAllOrders)?;

  let product_id = path.into_inner();
  let page = query.to_page();
  let items = app_state.orders.orders_by_product(product_id, &page).await?;
  let total = app_state.orders.count_orders_by_product(product_id).await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

// Flattened line listings.

pub async fn list_lines_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ViewAllOrders)?;

  let page = query.to_page();
  let items = app_state.orders.lines(&page).await?;
  let total = app_state.orders.count_lines().await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

pub async fn lines_by_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state
    .orders
    .order_by_id(order_id)
    .await?
    .ok_or_else(|| CoreError::not_found("order", order_id))?;
  require(&auth_user.0, Action::ViewUserOrders { owner: order.user_id })?;

  let page = query.to_page();
  let items = app_state.orders.lines_by_order(order_id, &page).await?;
  let total = app_state.orders.count_lines_by_order(order_id).await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

pub async fn lines_by_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  require(&auth_user.0, Action::ViewUserOrders { owner: user_id })?;

  let page = query.to_page();
  let items = app_state.orders.lines_by_user(user_id, &page).await?;
  let total = app_state.orders.count_lines_by_user(user_id).await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

pub async fn lines_by_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::ViewAllOrders)?;

  let product_id = path.into_inner();
  let page = query.to_page();
  let items = app_state.orders.lines_by_product(product_id, &page).await?;
  let total = app_state.orders.count_lines_by_product(product_id).await?;
  Ok(HttpResponse::Ok().json(Paged::assemble(items, &page, total)))
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusBody {
  pub status: OrderStatus,
}

/// Staff status write. Setting the status an order already has is rejected;
/// transitions are otherwise unordered single-step writes.
#[instrument(name = "handler::update_order_status", skip_all, fields(order_id = %path))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<OrderStatusBody>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::AdvanceOrderStatus)?;

  let order_id = path.into_inner();
  let order = app_state
    .orders
    .order_by_id(order_id)
    .await?
    .ok_or_else(|| CoreError::not_found("order", order_id))?;

  if order.status == payload.status {
    return Err(CoreError::Conflict(format!("order is already {:?}", order.status).to_lowercase()).into());
  }

  let updated = app_state.orders.set_status(order_id, payload.status).await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Status updated successfully",
    "order": updated,
  })))
}

pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  require(&auth_user.0, Action::DeleteOrder)?;

  let order_id = path.into_inner();
  let order = app_state
    .orders
    .order_by_id(order_id)
    .await?
    .ok_or_else(|| CoreError::not_found("order", order_id))?;

  if !order.status.is_deletable() {
    return Err(
      CoreError::Conflict("orders still in fulfilment cannot be deleted".to_string()).into(),
    );
  }

  app_state.orders.delete(order_id).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Deleted successfully"})))
}
