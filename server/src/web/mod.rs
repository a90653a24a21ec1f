// attire-server/src/web/mod.rs

pub mod handlers;
pub mod principal;
pub mod routes;

use serde::Deserialize;

use attire::store::page::DEFAULT_PAGE_SIZE;
use attire::Page;

/// Common `?page=&limit=` query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

impl PageQuery {
  pub fn to_page(&self) -> Page {
    Page::new(self.page.unwrap_or(1), self.limit.unwrap_or(DEFAULT_PAGE_SIZE))
  }
}
