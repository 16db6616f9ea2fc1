//! tabular-rs: pivot engine for schema-less analytics rows.
//!
//! Rows fetched from a remote data/analytics service are shaped two ways:
//! a paginated grid with a column schema inferred from the first row, and
//! wide per-date records with deterministic series colors for line charts.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod service;
pub mod telemetry;

pub use api::{Dashboard, EngineConfig};
pub use error::{TabularError, TabularResult};
