// tests/propagation_tests.rs
mod common;

use common::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

use attire::models::{CartEntry, Image, NewReview, Order, Size};
use attire::store::OrderStore;
use attire::{Error, ObjectStore};

async fn place_one(env: &TestEnv, product_id: Uuid, user_id: Uuid) -> Order {
  env
    .checkout
    .place_order(
      user_id,
      vec![CartEntry {
        product_id,
        quantity: 1,
        color: "black".to_string(),
        size: Size::M,
      }],
      shipping(),
    )
    .await
    .unwrap()
}

async fn review_line(env: &TestEnv, order: &Order, reviewer: Uuid, name: &str) {
  let line = &order.products[0];
  env
    .reviewing
    .submit(NewReview {
      user_id: reviewer,
      user_name: name.to_string(),
      user_image: Image::new("images/old-avatar", "http://assets.local/images/old-avatar"),
      product_id: line.product_id,
      order_id: order.id,
      product_uid: line.product_uid,
      product_image: Image::new("images/reviewer-shot", "http://assets.local/images/reviewer-shot"),
      review: "Looks good".to_string(),
      rating: 4,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn product_image_change_reaches_every_line_but_no_review() {
  let env = TestEnv::new();
  let alice = env.users.add(user("Alice"));
  let bob = env.users.add(user("Bob"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 50));
  let jeans = env.catalog.add(product("Jeans", dec!(60), 50));

  let first = place_one(&env, shirt, alice).await;
  let second = place_one(&env, shirt, bob).await;
  let unrelated = place_one(&env, jeans, alice).await;
  review_line(&env, &first, alice, "Alice").await;

  let fresh = Image::new("images/shirt-v2", "http://assets.local/images/shirt-v2");
  env.propagator.product_image_changed(shirt, &fresh).await;

  for order_id in [first.id, second.id] {
    let order = env.orders.order_by_id(order_id).await.unwrap().unwrap();
    assert_eq!(order.products[0].image, fresh);
  }
  // Unrelated product untouched.
  let unrelated = env.orders.order_by_id(unrelated.id).await.unwrap().unwrap();
  assert_eq!(unrelated.products[0].image.key, "images/jeans");

  // The reviewer's own photo is independent of the catalog image.
  let review = &env.reviews.all()[0];
  assert_eq!(review.product_image.key, "images/reviewer-shot");
}

#[tokio::test]
async fn renames_touch_only_the_users_reviews() {
  let env = TestEnv::new();
  let alice = env.users.add(user("Alice"));
  let bob = env.users.add(user("Bob"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 50));

  let first = place_one(&env, shirt, alice).await;
  let second = place_one(&env, shirt, bob).await;
  review_line(&env, &first, alice, "Alice").await;
  review_line(&env, &second, bob, "Bob").await;

  env.propagator.user_renamed(alice, "Alicia").await;

  let reviews = env.reviews.all();
  let alices = reviews.iter().find(|r| r.user_id == alice).unwrap();
  let bobs = reviews.iter().find(|r| r.user_id == bob).unwrap();
  assert_eq!(alices.user_name, "Alicia");
  assert_eq!(bobs.user_name, "Bob");
}

#[tokio::test]
async fn avatar_changes_propagate_into_reviews() {
  let env = TestEnv::new();
  let alice = env.users.add(user("Alice"));
  let shirt = env.catalog.add(product("Shirt", dec!(25), 50));

  let order = place_one(&env, shirt, alice).await;
  review_line(&env, &order, alice, "Alice").await;

  let fresh = Image::new("images/avatar-v2", "http://assets.local/images/avatar-v2");
  env.propagator.user_image_changed(alice, &fresh).await;

  assert_eq!(env.reviews.all()[0].user_image, fresh);
}

#[tokio::test]
async fn deleting_a_referenced_product_keeps_its_image_blob() {
  let env = TestEnv::new();
  let alice = env.users.add(user("Alice"));

  let blob = env.blobs.put(vec![1, 2, 3], "image/jpeg").await.unwrap();
  let mut shirt = product("Shirt", dec!(25), 50);
  shirt.image = blob.clone();
  let shirt_id = env.catalog.add(shirt);

  place_one(&env, shirt_id, alice).await;
  env.propagator.delete_product(shirt_id).await.unwrap();

  // Historical order lines still link the image, so the blob survives.
  assert!(env.blobs.contains(&blob.key));
  assert!(env.catalog.get(shirt_id).is_none());
}

#[tokio::test]
async fn deleting_an_unreferenced_product_removes_its_image_blob() {
  let env = TestEnv::new();

  let blob = env.blobs.put(vec![1, 2, 3], "image/jpeg").await.unwrap();
  let mut shirt = product("Shirt", dec!(25), 50);
  shirt.image = blob.clone();
  let shirt_id = env.catalog.add(shirt);

  env.propagator.delete_product(shirt_id).await.unwrap();

  assert!(!env.blobs.contains(&blob.key));
  assert!(env.catalog.get(shirt_id).is_none());
}

#[tokio::test]
async fn deleting_a_missing_product_is_not_found() {
  let env = TestEnv::new();
  let result = env.propagator.delete_product(Uuid::new_v4()).await;
  assert!(matches!(result, Err(Error::NotFound { entity: "product", .. })));
}
