use std::sync::Arc;

use tracing::debug;

use crate::core::{ColumnDescriptor, ColumnSchemaMemo, FlatRecord, Paginator};
use crate::error::TabularResult;

use super::GridPageSnapshot;

/// Paginated grid over the latest fetched batch of rows.
///
/// Columns are inferred once per batch. Replacing the batch keeps the page
/// position, clamped to the new page count.
#[derive(Debug)]
pub struct GridView {
    rows: Arc<[FlatRecord]>,
    columns: Arc<[ColumnDescriptor]>,
    schema: ColumnSchemaMemo,
    paginator: Paginator,
}

impl GridView {
    pub fn new(page_size: usize) -> TabularResult<Self> {
        Ok(Self {
            rows: Arc::from(Vec::new()),
            columns: Arc::from(Vec::new()),
            schema: ColumnSchemaMemo::new(),
            paginator: Paginator::new(page_size)?,
        })
    }

    /// Replaces the batch and re-infers the column schema.
    pub fn set_rows(&mut self, rows: Vec<FlatRecord>) {
        self.set_batch(Arc::from(rows));
    }

    /// Replaces the batch with a shared one; re-setting the same batch reuses
    /// the previously inferred columns.
    pub fn set_batch(&mut self, rows: Arc<[FlatRecord]>) {
        let previous_page = self.paginator.page_index();
        self.columns = self.schema.columns_for(&rows);
        self.paginator.set_total_rows(rows.len());
        self.rows = rows;
        debug!(
            row_count = self.rows.len(),
            column_count = self.columns.len(),
            previous_page,
            page_index = self.paginator.page_index(),
            "grid batch replaced"
        );
    }

    pub fn clear(&mut self) {
        self.set_rows(Vec::new());
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[FlatRecord] {
        &self.rows
    }

    #[must_use]
    pub fn batch(&self) -> Arc<[FlatRecord]> {
        Arc::clone(&self.rows)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    #[must_use]
    pub fn current_page_rows(&self) -> &[FlatRecord] {
        self.paginator.current_page_rows(&self.rows)
    }

    /// Cell text of the current page, one inner vector per row in column order.
    #[must_use]
    pub fn current_page_cells(&self) -> Vec<Vec<String>> {
        self.current_page_rows()
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.display_text(&column.key))
                    .collect()
            })
            .collect()
    }

    pub fn next(&mut self) {
        self.paginator.next();
    }

    pub fn previous(&mut self) {
        self.paginator.previous();
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.paginator.can_go_next()
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.paginator.can_go_previous()
    }

    #[must_use]
    pub fn snapshot(&self) -> GridPageSnapshot {
        GridPageSnapshot {
            columns: self.columns.to_vec(),
            rows: self.current_page_rows().to_vec(),
            page_index: self.paginator.page_index(),
            page_size: self.paginator.page_size(),
            page_count: self.paginator.page_count(),
            total_rows: self.paginator.total_rows(),
            can_go_next: self.paginator.can_go_next(),
            can_go_previous: self.paginator.can_go_previous(),
        }
    }
}
