use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::FlatRecord;

/// One inferred grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
}

impl ColumnDescriptor {
    /// Creates a column whose label is the field key verbatim.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Infers grid columns from the key set of the first record.
///
/// Keys that only appear in later rows get no column; absent values in later
/// rows render as empty cells.
#[must_use]
pub fn infer_columns(records: &[FlatRecord]) -> Vec<ColumnDescriptor> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let columns: Vec<ColumnDescriptor> = first.keys().map(ColumnDescriptor::new).collect();
    trace!(
        row_count = records.len(),
        column_count = columns.len(),
        "inferred columns from first record"
    );
    columns
}

/// Caches the inferred schema of the last batch it saw.
///
/// A batch is identified by its `Arc` allocation, so re-rendering the same
/// batch is free while a new fetch result always triggers inference.
#[derive(Debug, Default)]
pub struct ColumnSchemaMemo {
    batch: Option<Arc<[FlatRecord]>>,
    columns: Arc<[ColumnDescriptor]>,
}

impl ColumnSchemaMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns_for(&mut self, batch: &Arc<[FlatRecord]>) -> Arc<[ColumnDescriptor]> {
        let is_same_batch = self
            .batch
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, batch));
        if !is_same_batch {
            self.columns = infer_columns(batch).into();
            self.batch = Some(Arc::clone(batch));
        }
        Arc::clone(&self.columns)
    }
}
