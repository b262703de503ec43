use serde::Serialize;

use crate::errors::{CalculatorError, Result};

/// page size used by the exchange-rate listing
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// one page of a listing, numbered from 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// clamp-to-range pager over an in-memory slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(CalculatorError::InvalidConfiguration {
                message: "page size must be at least 1".to_string(),
            });
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// at least one page, even for an empty listing
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// map any requested page number into 1..=total_pages
    pub fn clamp(&self, requested: usize, len: usize) -> usize {
        requested.clamp(1, self.total_pages(len))
    }

    pub fn page<'a, T>(&self, items: &'a [T], requested: usize) -> Page<'a, T> {
        let total_pages = self.total_pages(items.len());
        let number = self.clamp(requested, items.len());

        let start = ((number - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());

        Page {
            number,
            total_pages,
            items: &items[start..end],
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
