// attire/src/blobs.rs

//! Object store seam for image blobs. Production deployments point this at
//! S3-compatible storage; the in-memory implementation here backs tests
//! and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Image;

#[async_trait]
pub trait ObjectStore: Send + Sync {
  /// Store a blob, returning its key and public URL.
  async fn put(&self, bytes: Vec<u8>, content_type: &str) -> Result<Image>;

  async fn delete(&self, key: &str) -> Result<()>;
}

pub struct MemoryObjectStore {
  base_url: String,
  blobs: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryObjectStore {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      blobs: Mutex::new(HashMap::new()),
    }
  }

  pub fn contains(&self, key: &str) -> bool {
    self.blobs.lock().contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.blobs.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.blobs.lock().is_empty()
  }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
  async fn put(&self, bytes: Vec<u8>, content_type: &str) -> Result<Image> {
    let key = format!("images/{}", Uuid::new_v4().simple());
    let url = format!("{}/{}", self.base_url.trim_end_matches('/'), key);
    self
      .blobs
      .lock()
      .insert(key.clone(), (content_type.to_string(), bytes));
    Ok(Image::new(key, url))
  }

  async fn delete(&self, key: &str) -> Result<()> {
    self.blobs.lock().remove(key);
    Ok(())
  }
}
