// attire/src/payment.rs

//! Payment gateway seam. The processor is an external collaborator; all
//! the core needs is "an amount in minor units becomes an intent id plus
//! a client-side confirmation secret".

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct PaymentIntent {
  pub id: String,
  pub client_secret: String,
  pub amount: i64,
  pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Create an authorized-but-uncaptured charge for `amount` minor units.
  async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent>;
}

/// Simulated provider: issues well-formed intents without talking to a real
/// processor. Keeps a log of everything it issued so callers (and tests)
/// can inspect what was actually charged.
#[derive(Default)]
pub struct MockGateway {
  issued: Mutex<Vec<PaymentIntent>>,
}

impl MockGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn issued(&self) -> Vec<PaymentIntent> {
    self.issued.lock().clone()
  }

  pub fn issued_count(&self) -> usize {
    self.issued.lock().len()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent> {
    if amount <= 0 {
      return Err(Error::gateway(anyhow::anyhow!(
        "amount must be greater than zero, got {amount}"
      )));
    }

    let id = format!("pi_{}", Uuid::new_v4().simple());
    let intent = PaymentIntent {
      id: id.clone(),
      client_secret: format!("{id}_secret_{}", Uuid::new_v4().simple()),
      amount,
      currency: currency.to_string(),
    };
    info!(intent_id = %intent.id, amount, currency, "created simulated payment intent");

    self.issued.lock().push(intent.clone());
    Ok(intent)
  }
}
