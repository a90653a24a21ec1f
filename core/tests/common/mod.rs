// tests/common/mod.rs
#![allow(dead_code)]

//! In-memory doubles for the store and gateway seams, plus builders for
//! test fixtures. These mirror the Postgres stores' observable behavior
//! (atomic counters, unique line uids, unique review-per-uid).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use uuid::Uuid;

use attire::error::{Error, Result};
use attire::models::{
  Category, Gender, Image, NewReview, Order, OrderDraft, OrderStatus, Product, ProductStatus,
  RatingSummary, Review, Role, ShippingAddress, Size, TopCategory, User,
};
use attire::payment::MockGateway;
use attire::store::{CatalogStore, OrderStore, ReviewStore, UserStore};
use attire::{tier, Checkout, MemoryObjectStore, ObjectStore, PaymentGateway, PaymentIntent, Propagator, Reviewing};

// --- Fixture builders ---

pub fn user(name: &str) -> User {
  let now = Utc::now();
  User {
    id: Uuid::new_v4(),
    name: name.to_string(),
    email: format!("{}@example.com", name.to_lowercase()),
    role: Role::User,
    image: Image::new("images/avatar", "http://assets.local/images/avatar"),
    created_at: now,
    updated_at: now,
  }
}

pub fn product(name: &str, price: Decimal, in_stock: i32) -> Product {
  let now = Utc::now();
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    slug: name.to_lowercase().replace(' ', "-"),
    description: format!("{name} description"),
    image: Image::new(
      format!("images/{}", name.to_lowercase()),
      format!("http://assets.local/images/{}", name.to_lowercase()),
    ),
    original_price: price,
    price,
    discount: 0,
    in_stock,
    colors: vec!["black".to_string(), "white".to_string()],
    sizes: vec![Size::M, Size::L],
    brand: "Acme".to_string(),
    category: Category::Men,
    product_type: "t-shirt".to_string(),
    gender: Gender::Unisex,
    status: ProductStatus::Active,
    average_rating: 0.0,
    total_reviews: 0,
    sales: 0,
    top_category: TopCategory::Regular,
    created_at: now,
    updated_at: now,
  }
}

pub fn shipping() -> ShippingAddress {
  ShippingAddress {
    country: "Sweden".to_string(),
    city: "Stockholm".to_string(),
    house_number_or_name: "12B".to_string(),
    phone: "+46701234567".to_string(),
    post_code: 11122,
  }
}

// --- In-memory stores ---

#[derive(Default)]
pub struct MemUsers {
  users: Mutex<HashMap<Uuid, User>>,
}

impl MemUsers {
  pub fn add(&self, user: User) -> Uuid {
    let id = user.id;
    self.users.lock().insert(id, user);
    id
  }
}

#[async_trait]
impl UserStore for MemUsers {
  async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.users.lock().get(&id).cloned())
  }
}

#[derive(Default)]
pub struct MemCatalog {
  products: Mutex<HashMap<Uuid, Product>>,
  fail_record_sale: AtomicBool,
}

impl MemCatalog {
  pub fn add(&self, product: Product) -> Uuid {
    let id = product.id;
    self.products.lock().insert(id, product);
    id
  }

  pub fn get(&self, id: Uuid) -> Option<Product> {
    self.products.lock().get(&id).cloned()
  }

  pub fn set_price(&self, id: Uuid, price: Decimal) {
    if let Some(product) = self.products.lock().get_mut(&id) {
      product.price = price;
    }
  }

  pub fn fail_record_sale(&self, fail: bool) {
    self.fail_record_sale.store(fail, Ordering::SeqCst);
  }
}

#[async_trait]
impl CatalogStore for MemCatalog {
  async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
    Ok(self.products.lock().get(&id).cloned())
  }

  async fn record_sale(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    if self.fail_record_sale.load(Ordering::SeqCst) {
      return Err(Error::Persistence(sqlx::Error::PoolClosed));
    }
    let mut products = self.products.lock();
    let product = products
      .get_mut(&product_id)
      .ok_or_else(|| Error::not_found("product", product_id))?;
    product.sales += quantity;
    product.in_stock -= quantity;
    Ok(())
  }

  async fn set_rating_and_tier(&self, product_id: Uuid, summary: RatingSummary) -> Result<()> {
    let mut products = self.products.lock();
    let product = products
      .get_mut(&product_id)
      .ok_or_else(|| Error::not_found("product", product_id))?;
    product.total_reviews = summary.total_reviews;
    product.average_rating = summary.average_rating;
    product.top_category = tier::classify(summary.average_rating, product.sales);
    Ok(())
  }

  async fn remove(&self, product_id: Uuid) -> Result<()> {
    self
      .products
      .lock()
      .remove(&product_id)
      .map(|_| ())
      .ok_or_else(|| Error::not_found("product", product_id))
  }
}

#[derive(Default)]
pub struct MemOrders {
  orders: Mutex<Vec<Order>>,
}

impl MemOrders {
  pub fn all(&self) -> Vec<Order> {
    self.orders.lock().clone()
  }

  pub fn len(&self) -> usize {
    self.orders.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.orders.lock().is_empty()
  }
}

#[async_trait]
impl OrderStore for MemOrders {
  async fn create(&self, draft: OrderDraft) -> Result<Order> {
    let now = Utc::now();
    let order_id = Uuid::new_v4();
    let products = draft
      .lines
      .iter()
      .enumerate()
      .map(|(index, line)| attire::models::OrderLine {
        product_uid: Uuid::new_v4(),
        order_id,
        line_no: index as i32,
        product_id: line.product_id,
        name: line.name.clone(),
        slug: line.slug.clone(),
        description: line.description.clone(),
        image: line.image.clone(),
        price: line.price,
        quantity: line.quantity,
        color: line.color.clone(),
        size: line.size,
        brand: line.brand.clone(),
        category: line.category,
        product_type: line.product_type.clone(),
        gender: line.gender,
        ordered_at: now,
      })
      .collect();

    let order = Order {
      id: order_id,
      user_id: draft.user_id,
      products,
      status: OrderStatus::Pending,
      total_cost: draft.total_cost,
      payment_intent: draft.payment_intent,
      client_secret: draft.client_secret,
      shipping_address: draft.shipping_address,
      created_at: now,
      updated_at: now,
    };
    self.orders.lock().push(order.clone());
    Ok(order)
  }

  async fn order_by_id(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.orders.lock().iter().find(|o| o.id == id).cloned())
  }

  async fn set_line_image(&self, product_id: Uuid, image: &Image) -> Result<u64> {
    let mut touched = 0;
    for order in self.orders.lock().iter_mut() {
      for line in order.products.iter_mut() {
        if line.product_id == product_id {
          line.image = image.clone();
          touched += 1;
        }
      }
    }
    Ok(touched)
  }

  async fn product_line_count(&self, product_id: Uuid) -> Result<i64> {
    let count = self
      .orders
      .lock()
      .iter()
      .flat_map(|o| o.products.iter())
      .filter(|line| line.product_id == product_id)
      .count();
    Ok(count as i64)
  }
}

#[derive(Default)]
pub struct MemReviews {
  reviews: Mutex<Vec<Review>>,
}

impl MemReviews {
  pub fn all(&self) -> Vec<Review> {
    self.reviews.lock().clone()
  }
}

#[async_trait]
impl ReviewStore for MemReviews {
  async fn insert(&self, draft: NewReview) -> Result<Review> {
    let mut reviews = self.reviews.lock();
    // Same guarantee the unique index gives the Postgres store.
    if reviews.iter().any(|r| r.product_uid == draft.product_uid) {
      return Err(Error::Conflict("already reviewed".to_string()));
    }
    let now = Utc::now();
    let review = Review {
      id: Uuid::new_v4(),
      user_id: draft.user_id,
      user_name: draft.user_name,
      user_image: draft.user_image,
      product_id: draft.product_id,
      order_id: draft.order_id,
      product_uid: draft.product_uid,
      product_image: draft.product_image,
      review: draft.review,
      rating: draft.rating,
      created_at: now,
      updated_at: now,
    };
    reviews.push(review.clone());
    Ok(review)
  }

  async fn review_by_id(&self, id: Uuid) -> Result<Option<Review>> {
    Ok(self.reviews.lock().iter().find(|r| r.id == id).cloned())
  }

  async fn review_by_product_uid(&self, product_uid: Uuid) -> Result<Option<Review>> {
    Ok(
      self
        .reviews
        .lock()
        .iter()
        .find(|r| r.product_uid == product_uid)
        .cloned(),
    )
  }

  async fn update(&self, id: Uuid, review: &str, rating: i32) -> Result<Review> {
    let mut reviews = self.reviews.lock();
    let entry = reviews
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or_else(|| Error::not_found("review", id))?;
    entry.review = review.to_string();
    entry.rating = rating;
    entry.updated_at = Utc::now();
    Ok(entry.clone())
  }

  async fn delete(&self, id: Uuid) -> Result<Review> {
    let mut reviews = self.reviews.lock();
    let index = reviews
      .iter()
      .position(|r| r.id == id)
      .ok_or_else(|| Error::not_found("review", id))?;
    Ok(reviews.remove(index))
  }

  async fn rating_summary(&self, product_id: Uuid) -> Result<RatingSummary> {
    let reviews = self.reviews.lock();
    let ratings: Vec<i32> = reviews
      .iter()
      .filter(|r| r.product_id == product_id)
      .map(|r| r.rating)
      .collect();
    if ratings.is_empty() {
      return Ok(RatingSummary::empty());
    }
    Ok(RatingSummary {
      total_reviews: ratings.len() as i32,
      average_rating: f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64,
    })
  }

  async fn set_user_name(&self, user_id: Uuid, name: &str) -> Result<u64> {
    let mut touched = 0;
    for review in self.reviews.lock().iter_mut() {
      if review.user_id == user_id {
        review.user_name = name.to_string();
        touched += 1;
      }
    }
    Ok(touched)
  }

  async fn set_user_image(&self, user_id: Uuid, image: &Image) -> Result<u64> {
    let mut touched = 0;
    for review in self.reviews.lock().iter_mut() {
      if review.user_id == user_id {
        review.user_image = image.clone();
        touched += 1;
      }
    }
    Ok(touched)
  }
}

/// Gateway that always refuses; placement must abort with nothing persisted.
pub struct FailingGateway;

#[async_trait]
impl PaymentGateway for FailingGateway {
  async fn create_intent(&self, _amount: i64, _currency: &str) -> Result<PaymentIntent> {
    Err(Error::gateway(anyhow::anyhow!("processor unreachable")))
  }
}

// --- Wired-up environment ---

pub struct TestEnv {
  pub users: Arc<MemUsers>,
  pub catalog: Arc<MemCatalog>,
  pub orders: Arc<MemOrders>,
  pub reviews: Arc<MemReviews>,
  pub gateway: Arc<MockGateway>,
  pub blobs: Arc<MemoryObjectStore>,
  pub checkout: Checkout,
  pub reviewing: Reviewing,
  pub propagator: Arc<Propagator>,
}

impl TestEnv {
  pub fn new() -> Self {
    let users = Arc::new(MemUsers::default());
    let catalog = Arc::new(MemCatalog::default());
    let orders = Arc::new(MemOrders::default());
    let reviews = Arc::new(MemReviews::default());
    let gateway = Arc::new(MockGateway::new());
    let blobs = Arc::new(MemoryObjectStore::new("http://assets.local"));

    let propagator = Arc::new(Propagator::new(
      catalog.clone() as Arc<dyn CatalogStore>,
      orders.clone() as Arc<dyn OrderStore>,
      reviews.clone() as Arc<dyn ReviewStore>,
      blobs.clone() as Arc<dyn ObjectStore>,
    ));
    let checkout = Checkout::new(
      users.clone() as Arc<dyn UserStore>,
      catalog.clone() as Arc<dyn CatalogStore>,
      orders.clone() as Arc<dyn OrderStore>,
      gateway.clone() as Arc<dyn PaymentGateway>,
    );
    let reviewing = Reviewing::new(
      catalog.clone() as Arc<dyn CatalogStore>,
      orders.clone() as Arc<dyn OrderStore>,
      reviews.clone() as Arc<dyn ReviewStore>,
      propagator.clone(),
    );

    Self {
      users,
      catalog,
      orders,
      reviews,
      gateway,
      blobs,
      checkout,
      reviewing,
      propagator,
    }
  }

  /// Checkout wired to a gateway that always fails.
  pub fn with_failing_gateway() -> Self {
    let env = Self::new();
    let checkout = Checkout::new(
      env.users.clone() as Arc<dyn UserStore>,
      env.catalog.clone() as Arc<dyn CatalogStore>,
      env.orders.clone() as Arc<dyn OrderStore>,
      Arc::new(FailingGateway) as Arc<dyn PaymentGateway>,
    );
    Self { checkout, ..env }
  }
}
