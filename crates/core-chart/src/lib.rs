//! Chart entities: per-series sample storage, the step-indexed metric chart,
//! and the timestamp-indexed telemetry chart.
//!
//! Charts own their samples and their canvas. They know nothing about grids,
//! pages, or input routing; a grid tells a chart its size, feeds it data,
//! forwards zoom/inspection gestures in graph-pixel coordinates, and blits
//! the finished canvas wherever it lands on screen.

pub mod epoch;
pub mod series;
pub mod timeseries;

pub use epoch::{ChartInspection, EpochLineChart, ZoomDirection};
pub use series::{Bounds, Series, SeriesStyle};
pub use timeseries::TimeSeriesLineChart;

/// Format a value to four significant figures, the legend/axis convention.
/// Magnitudes outside a readable fixed-point window fall back to scientific
/// notation (still four significant figures).
pub fn fmt_value(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs().log10().floor() as i32;
    if !(-4..4).contains(&magnitude) {
        return format!("{v:.3e}");
    }
    let decimals = (3 - magnitude).max(0) as usize;
    let formatted = format!("{v:.decimals$}");
    // Drop a trailing ".000…" tail so integers read as integers.
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
