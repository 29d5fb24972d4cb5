//! Chart grids: pure layout math, filtering, the metrics grid, and the
//! system-telemetry grid.
//!
//! Grids own their chart collections exclusively. They translate screen
//! coordinates into chart-local graph pixels for zoom and inspection, and
//! decide which charts are resident (visible page) versus parked.

pub mod filter;
pub mod metrics;
pub mod panel;
pub mod system;

pub use filter::{FilterMatcher, FilterMode, FilterState};
pub use metrics::{MetricsGrid, SeriesColorMode};
pub use panel::{GridNavigator, compute_grid_dims, effective_grid_size};
pub use system::{MetricKey, SystemColorMode, SystemMetricsGrid, classify_metric};
