use std::ops::Range;

use crate::error::{TabularError, TabularResult};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Page position over a row window of known length.
///
/// The page size is fixed at construction and drives both the page count and
/// the slice bounds. The index is only moved by navigation, except that
/// [`Paginator::set_total_rows`] clamps it when the data shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_index: usize,
    page_size: usize,
    total_rows: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> TabularResult<Self> {
        if page_size == 0 {
            return Err(TabularError::InvalidConfig(
                "page size must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            page_index: 0,
            page_size,
            total_rows: 0,
        })
    }

    pub fn with_total_rows(page_size: usize, total_rows: usize) -> TabularResult<Self> {
        let mut paginator = Self::new(page_size)?;
        paginator.total_rows = total_rows;
        Ok(paginator)
    }

    #[must_use]
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.page_size)
    }

    /// Updates the row count after a data refresh, keeping the index in range.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        let max_index = self.page_count().saturating_sub(1);
        if self.page_index > max_index {
            self.page_index = max_index;
        }
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn next(&mut self) {
        if self.can_go_next() {
            self.page_index += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.can_go_previous() {
            self.page_index -= 1;
        }
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn last(&mut self) {
        self.page_index = self.page_count().saturating_sub(1);
    }

    /// Row range covered by the current page.
    #[must_use]
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.total_rows);
        let end = start.saturating_add(self.page_size).min(self.total_rows);
        start..end
    }

    /// Slices `rows` to the current page.
    ///
    /// Bounds are also clamped to `rows.len()` so a stale row count can never
    /// index out of range.
    #[must_use]
    pub fn current_page_rows<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let range = self.page_range();
        let end = range.end.min(rows.len());
        let start = range.start.min(end);
        &rows[start..end]
    }
}
