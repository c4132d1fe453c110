//! Paging coordinates over a list the model never owns.
//!
//! Invariant: `1 <= page <= max_page()` after every operation, where
//! `max_page() = max(1, ceil(total / page_size))`. Fields are private so the
//! invariant cannot be broken from outside.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Pagination {
    /// Start on page 1 with no items. A zero page size is raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn max_page(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Set the item count. The page is only ever lowered to fit, never raised.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        let max = self.max_page();
        if self.page > max {
            self.page = max;
        }
    }

    /// A new list arrived: back to page 1 with the new count.
    pub fn reset(&mut self, total: usize) {
        self.page = 1;
        self.set_total(total);
    }

    /// Advance one page. Returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.page < self.max_page() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns false at page 1.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped into `1..=max_page()`. Returns true when the
    /// page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.max_page());
        let changed = target != self.page;
        self.page = target;
        changed
    }

    /// Change the page size and jump to page 1, even when the current page
    /// would still be valid. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        true
    }

    /// `set_page_size` from user input (a selector value). Anything that is
    /// not a positive integer is ignored.
    pub fn set_page_size_str(&mut self, raw: &str) -> bool {
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => self.set_page_size(n as usize),
            _ => false,
        }
    }

    /// Index range of the current page, clipped to `total`.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(self.total);
        start.min(end)..end
    }

    /// The current page of a caller-supplied list, clipped to its bounds.
    pub fn slice_for_page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1).saturating_mul(self.page_size);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    /// `Page 2 / 5 (95 total)`.
    pub fn page_info(&self) -> String {
        format!("Page {} / {} ({} total)", self.page, self.max_page(), self.total)
    }
}
