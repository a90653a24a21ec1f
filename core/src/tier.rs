// attire/src/tier.rs

//! Top-category classification. First matching rule wins; "Highest rated"
//! is checked before the Bestseller and Featured thresholds, so a product
//! that crosses 50 sales with a rating still ≥ 4.5 lands on Bestseller.

use crate::models::TopCategory;

pub fn classify(average_rating: f64, sales: i32) -> TopCategory {
  if average_rating >= 4.8 && sales < 50 {
    TopCategory::HighestRated
  } else if average_rating >= 4.5 && sales >= 50 {
    TopCategory::Bestseller
  } else if (4.5..=4.7).contains(&average_rating) {
    TopCategory::Featured
  } else {
    TopCategory::Regular
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn featured_below_the_sales_threshold() {
    assert_eq!(classify(4.6, 10), TopCategory::Featured);
    assert_eq!(classify(4.5, 0), TopCategory::Featured);
    assert_eq!(classify(4.7, 49), TopCategory::Featured);
  }

  #[test]
  fn bestseller_once_sales_cross_fifty() {
    assert_eq!(classify(4.6, 60), TopCategory::Bestseller);
    assert_eq!(classify(4.5, 50), TopCategory::Bestseller);
    assert_eq!(classify(4.9, 120), TopCategory::Bestseller);
  }

  #[test]
  fn highest_rated_wins_before_the_other_thresholds() {
    assert_eq!(classify(4.9, 10), TopCategory::HighestRated);
    assert_eq!(classify(4.8, 49), TopCategory::HighestRated);
  }

  #[test]
  fn everything_else_is_regular() {
    assert_eq!(classify(4.4, 200), TopCategory::Regular);
    assert_eq!(classify(0.0, 0), TopCategory::Regular);
    assert_eq!(classify(3.9, 49), TopCategory::Regular);
  }

  #[test]
  fn classification_is_idempotent() {
    let first = classify(4.6, 60);
    let second = classify(4.6, 60);
    assert_eq!(first, second);
  }
}
