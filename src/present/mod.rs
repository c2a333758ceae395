pub mod chart;
pub mod export;
pub mod grid;

pub use chart::{ChartSpec, Series};
pub use export::write_records_parquet;
pub use grid::render_grid;
