// tests/checkout_tests.rs
mod common;

use std::collections::HashSet;
use std::time::Duration;

use common::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

use attire::models::{CartEntry, Size};
use attire::store::OrderStore;
use attire::Error;

fn entry(product_id: Uuid, quantity: i32) -> CartEntry {
  CartEntry {
    product_id,
    quantity,
    color: "black".to_string(),
    size: Size::M,
  }
}

// Spawned best-effort work runs once the test task yields.
async fn settle() {
  tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn order_total_is_snapshotted_at_placement() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));

  let mut shirt = product("Shirt", dec!(100), 20);
  shirt.original_price = dec!(100);
  shirt.discount = 10;
  shirt.price = dec!(90);
  let product_id = env.catalog.add(shirt);

  let order = env
    .checkout
    .place_order(user_id, vec![entry(product_id, 1)], shipping())
    .await
    .unwrap();

  assert_eq!(order.total_cost, dec!(90));
  assert_eq!(order.products.len(), 1);
  assert_eq!(order.products[0].price, dec!(90));

  // A later catalog price change must not reach the stored order.
  env.catalog.set_price(product_id, dec!(80));
  let stored = env.orders.order_by_id(order.id).await.unwrap().unwrap();
  assert_eq!(stored.total_cost, dec!(90));
  assert_eq!(stored.products[0].price, dec!(90));
}

#[tokio::test]
async fn totals_sum_price_times_quantity_across_lines() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(19.99), 50));
  let jeans = env.catalog.add(product("Jeans", dec!(49.50), 50));

  let order = env
    .checkout
    .place_order(user_id, vec![entry(shirt, 3), entry(jeans, 2)], shipping())
    .await
    .unwrap();

  assert_eq!(order.total_cost, dec!(158.97));

  // The gateway is asked for the total in minor units.
  let issued = env.gateway.issued();
  assert_eq!(issued.len(), 1);
  assert_eq!(issued[0].amount, 15897);
  assert_eq!(issued[0].currency, "usd");
  assert_eq!(order.payment_intent, issued[0].id);
  assert_eq!(order.client_secret, issued[0].client_secret);
}

#[tokio::test]
async fn line_uids_are_globally_unique() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 100));
  let jeans = env.catalog.add(product("Jeans", dec!(60), 100));

  // Same product twice within one order, and again in a second order.
  let first = env
    .checkout
    .place_order(
      user_id,
      vec![entry(shirt, 1), entry(shirt, 2), entry(jeans, 1)],
      shipping(),
    )
    .await
    .unwrap();
  let second = env
    .checkout
    .place_order(user_id, vec![entry(shirt, 1)], shipping())
    .await
    .unwrap();

  let uids: HashSet<Uuid> = first
    .products
    .iter()
    .chain(second.products.iter())
    .map(|line| line.product_uid)
    .collect();
  assert_eq!(uids.len(), 4);
}

#[tokio::test]
async fn unknown_product_fails_with_no_side_effects() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 10));

  let result = env
    .checkout
    .place_order(
      user_id,
      vec![entry(shirt, 1), entry(Uuid::new_v4(), 1)],
      shipping(),
    )
    .await;

  assert!(matches!(result, Err(Error::NotFound { entity: "product", .. })));
  assert!(env.orders.is_empty());
  assert_eq!(env.gateway.issued_count(), 0);

  settle().await;
  assert_eq!(env.catalog.get(shirt).unwrap().sales, 0);
}

#[tokio::test]
async fn unknown_user_fails_placement() {
  let env = TestEnv::new();
  let shirt = env.catalog.add(product("Shirt", dec!(25), 10));

  let result = env
    .checkout
    .place_order(Uuid::new_v4(), vec![entry(shirt, 1)], shipping())
    .await;

  assert!(matches!(result, Err(Error::NotFound { entity: "user", .. })));
  assert_eq!(env.gateway.issued_count(), 0);
}

#[tokio::test]
async fn malformed_carts_are_rejected() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 10));

  let empty = env.checkout.place_order(user_id, vec![], shipping()).await;
  assert!(matches!(empty, Err(Error::Validation(_))));

  let zero_quantity = env
    .checkout
    .place_order(user_id, vec![entry(shirt, 0)], shipping())
    .await;
  assert!(matches!(zero_quantity, Err(Error::Validation(_))));
  assert!(env.orders.is_empty());
}

#[tokio::test]
async fn gateway_failure_aborts_before_persistence() {
  let env = TestEnv::with_failing_gateway();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 10));

  let result = env
    .checkout
    .place_order(user_id, vec![entry(shirt, 1)], shipping())
    .await;

  assert!(matches!(result, Err(Error::Gateway { .. })));
  assert!(env.orders.is_empty());

  settle().await;
  assert_eq!(env.catalog.get(shirt).unwrap().sales, 0);
}

#[tokio::test]
async fn placement_decrements_stock_and_bumps_sales() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 10));
  let jeans = env.catalog.add(product("Jeans", dec!(60), 5));

  env
    .checkout
    .place_order(user_id, vec![entry(shirt, 3), entry(jeans, 2)], shipping())
    .await
    .unwrap();

  settle().await;
  let shirt_after = env.catalog.get(shirt).unwrap();
  assert_eq!(shirt_after.sales, 3);
  assert_eq!(shirt_after.in_stock, 7);
  let jeans_after = env.catalog.get(jeans).unwrap();
  assert_eq!(jeans_after.sales, 2);
  assert_eq!(jeans_after.in_stock, 3);
}

#[tokio::test]
async fn stock_update_failure_does_not_fail_the_order() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 10));
  env.catalog.fail_record_sale(true);

  let order = env
    .checkout
    .place_order(user_id, vec![entry(shirt, 2)], shipping())
    .await
    .unwrap();

  settle().await;
  // The order stands even though the decrement never landed.
  assert!(env.orders.order_by_id(order.id).await.unwrap().is_some());
  let after = env.catalog.get(shirt).unwrap();
  assert_eq!(after.sales, 0);
  assert_eq!(after.in_stock, 10);
}

#[tokio::test]
async fn lines_snapshot_current_catalog_fields() {
  let env = TestEnv::new();
  let user_id = env.users.add(user("Alice"));
  let shirt = product("Shirt", dec!(25), 10);
  let image = shirt.image.clone();
  let product_id = env.catalog.add(shirt);

  let order = env
    .checkout
    .place_order(user_id, vec![entry(product_id, 1)], shipping())
    .await
    .unwrap();

  let line = &order.products[0];
  assert_eq!(line.product_id, product_id);
  assert_eq!(line.name, "Shirt");
  assert_eq!(line.slug, "shirt");
  assert_eq!(line.image, image);
  assert_eq!(line.brand, "Acme");
  assert_eq!(line.color, "black");
  assert_eq!(line.order_id, order.id);
}
