//! Fixed-size windowing over ordered listings.

use serde::Serialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: usize = 10;

/// Splits a collection of known size into numbered pages.
///
/// Page numbers start at 1. A collection with no items still has one
/// (empty) page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn num_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    /// Resolves the raw `?page=` value against `total` items.
    ///
    /// Missing, non-numeric, zero and out-of-range values all resolve to 1.
    pub fn resolve(&self, requested: Option<&str>, total: usize) -> usize {
        requested
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&n| n >= 1 && n <= self.num_pages(total))
            .unwrap_or(1)
    }

    /// Offset and limit of page `number`.
    pub fn window(&self, number: usize) -> (usize, usize) {
        (number.saturating_sub(1) * self.per_page, self.per_page)
    }

    /// Builds a page from items already sliced to `number`'s window.
    pub fn page<T>(&self, items: Vec<T>, number: usize, total: usize) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(total),
            total,
        }
    }

    /// Paginates a fully loaded collection.
    pub fn paginate<T>(&self, mut all: Vec<T>, requested: Option<&str>) -> Page<T> {
        let total = all.len();
        let number = self.resolve(requested, total);
        let (offset, limit) = self.window(number);
        let items: Vec<T> = all.drain(offset.min(total)..).take(limit).collect();
        self.page(items, number, total)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.num_pages > 1
    }

    pub fn next_page_number(&self) -> usize {
        (self.number + 1).min(self.num_pages)
    }

    pub fn previous_page_number(&self) -> usize {
        self.number.saturating_sub(1).max(1)
    }
}

impl<T> std::ops::Index<usize> for Page<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}
