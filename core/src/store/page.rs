// attire/src/store/page.rs

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// A skip/limit window over a listing. Page numbers start at 1.
#[derive(Debug, Clone, Copy)]
pub struct Page {
  number: u32,
  limit: u32,
}

impl Page {
  pub fn new(number: u32, limit: u32) -> Self {
    Self {
      number: number.max(1),
      limit: limit.max(1),
    }
  }

  pub fn number(&self) -> u32 {
    self.number
  }

  pub fn limit(&self) -> i64 {
    i64::from(self.limit)
  }

  pub fn offset(&self) -> i64 {
    i64::from(self.number - 1) * i64::from(self.limit)
  }
}

impl Default for Page {
  fn default() -> Self {
    Self::new(1, DEFAULT_PAGE_SIZE)
  }
}

/// A page of results plus the navigation envelope the API exposes.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
  pub current_page: u32,
  pub prev_page: Option<u32>,
  pub next_page: Option<u32>,
  pub total_pages: u32,
  pub items: Vec<T>,
}

impl<T> Paged<T> {
  pub fn assemble(items: Vec<T>, page: &Page, total: i64) -> Self {
    let limit = page.limit().max(1);
    let total_pages = ((total + limit - 1) / limit).max(0) as u32;
    let current_page = page.number();
    Self {
      current_page,
      prev_page: (current_page > 1).then(|| current_page - 1),
      next_page: (current_page < total_pages).then(|| current_page + 1),
      total_pages,
      items,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn offsets_skip_previous_pages() {
    assert_eq!(Page::new(1, 8).offset(), 0);
    assert_eq!(Page::new(3, 8).offset(), 16);
  }

  #[test]
  fn zero_page_and_limit_are_clamped() {
    let page = Page::new(0, 0);
    assert_eq!(page.number(), 1);
    assert_eq!(page.limit(), 1);
  }

  #[test]
  fn envelope_navigation() {
    let paged = Paged::assemble(vec![1, 2, 3], &Page::new(2, 3), 8);
    assert_eq!(paged.total_pages, 3);
    assert_eq!(paged.prev_page, Some(1));
    assert_eq!(paged.next_page, Some(3));

    let last = Paged::assemble(vec![4], &Page::new(3, 3), 8);
    assert_eq!(last.next_page, None);

    let empty = Paged::assemble(Vec::<i32>::new(), &Page::new(1, 8), 0);
    assert_eq!(empty.total_pages, 0);
    assert_eq!(empty.prev_page, None);
    assert_eq!(empty.next_page, None);
  }
}
