//! Data handed to a chart renderer: colors and series-to-color assignment.
//!
//! Drawing itself lives in the host application.

mod colorizer;
mod palette;
mod primitives;

pub use colorizer::{SeriesColorizer, SeriesColors};
pub use palette::{CATEGORY10, CategoricalPalette, SequentialPalette, VIRIDIS_STOPS};
pub use primitives::Color;
