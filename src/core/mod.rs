pub mod pagination;
pub mod pivot;
pub mod primitives;
pub mod schema;
pub mod types;
pub mod windowing;

pub use pagination::{DEFAULT_PAGE_SIZE, Paginator};
pub use pivot::{
    PivotSpec, PivotTable, WideRecord, pivot_long_to_wide, series_keys_from_first_record,
};
pub use primitives::{PivotKey, format_date, parse_date, scalar_to_date};
pub use schema::{ColumnDescriptor, ColumnSchemaMemo, infer_columns};
pub use types::{FlatRecord, ScalarValue};
pub use windowing::{records_for_entities, records_in_date_window, sort_by_date};
