// attire/src/checkout.rs

//! Order placement. Steps 1–5 are strictly sequential; the stock/sales
//! decrement at the end is detached from the caller's response and never
//! rolls the order back. There is no distributed transaction across the
//! gateway and the stores: a store failure after a successful intent
//! leaves that intent orphaned.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{CartEntry, LineDraft, Order, OrderDraft, ShippingAddress};
use crate::payment::PaymentGateway;
use crate::pricing;
use crate::store::{CatalogStore, OrderStore, UserStore};

pub const CURRENCY: &str = "usd";

pub struct Checkout {
  users: Arc<dyn UserStore>,
  catalog: Arc<dyn CatalogStore>,
  orders: Arc<dyn OrderStore>,
  gateway: Arc<dyn PaymentGateway>,
}

impl Checkout {
  pub fn new(
    users: Arc<dyn UserStore>,
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
  ) -> Self {
    Self {
      users,
      catalog,
      orders,
      gateway,
    }
  }

  /// Validate the cart against the catalog, create a payment intent for
  /// the total, persist the order with per-line snapshots and fresh line
  /// uids, then kick off the best-effort stock decrement.
  #[instrument(name = "checkout::place_order", skip(self, entries, shipping_address), fields(user_id = %user_id, lines = entries.len()))]
  pub async fn place_order(
    &self,
    user_id: Uuid,
    entries: Vec<CartEntry>,
    shipping_address: ShippingAddress,
  ) -> Result<Order> {
    if entries.is_empty() {
      return Err(Error::Validation("order must contain at least one product".to_string()));
    }
    if let Some(bad) = entries.iter().find(|e| e.quantity < 1) {
      return Err(Error::Validation(format!(
        "quantity must be at least 1 for product {}",
        bad.product_id
      )));
    }

    self
      .users
      .user_by_id(user_id)
      .await?
      .ok_or_else(|| Error::not_found("user", user_id))?;

    // Resolve every cart entry against the catalog before anything is
    // written; one bad reference fails the entire order.
    let mut lines = Vec::with_capacity(entries.len());
    for entry in &entries {
      let product = self
        .catalog
        .product_by_id(entry.product_id)
        .await?
        .ok_or_else(|| Error::not_found("product", entry.product_id))?;
      lines.push(LineDraft::snapshot(&product, entry));
    }

    let total_cost: Decimal = lines
      .iter()
      .map(|line| line.price * Decimal::from(line.quantity))
      .sum();

    let intent = self
      .gateway
      .create_intent(pricing::minor_units(total_cost)?, CURRENCY)
      .await?;

    let order = self
      .orders
      .create(OrderDraft {
        user_id,
        lines,
        total_cost,
        payment_intent: intent.id,
        client_secret: intent.client_secret,
        shipping_address,
      })
      .await?;

    info!(order_id = %order.id, %total_cost, "order placed");

    for line in &order.products {
      let catalog = Arc::clone(&self.catalog);
      let (order_id, product_id, quantity) = (order.id, line.product_id, line.quantity);
      tokio::spawn(async move {
        if let Err(err) = catalog.record_sale(product_id, quantity).await {
          warn!(
            %order_id,
            %product_id,
            quantity,
            error = %err,
            "stock/sales update failed after order placement"
          );
        }
      });
    }

    Ok(order)
  }
}
