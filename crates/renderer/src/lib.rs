//! Chart models for the dashboard.
//!
//! Renderers are pure: they take a snapshot of core data and produce plain
//! values (strings, fractions, labels) that any front end can draw. Nothing
//! here knows about the GUI toolkit, and nothing in `netdash-core` knows
//! about this crate.

pub mod monthly;
pub mod sparkline;

pub use monthly::{DayBar, MonthlyChart, MonthlyChartRenderer};
pub use sparkline::{Sparkline, SparklineRenderer};

/// Turns a snapshot of `T`s into something drawable.
///
/// Must accept an empty slice.
pub trait ChartRenderer<T> {
    type Output;

    fn render(&self, data: &[T]) -> Self::Output;
}
