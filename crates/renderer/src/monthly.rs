use crate::ChartRenderer;
use netdash_core::format::format_bytes;
use netdash_core::model::DayUsage;

/// One day of the monthly bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBar {
    /// Day of month, e.g. `"9"`.
    pub label: String,
    /// Bar lengths in `[0, 1]` against the chart's shared scale.
    pub upload:   f32,
    pub download: f32,
    pub upload_text:   String,
    pub download_text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyChart {
    pub bars: Vec<DayBar>,
    /// Largest single bar value; both series share this axis.
    pub axis_max: u64,
}

impl MonthlyChart {
    /// Number of days with data.
    pub fn data_points(&self) -> usize {
        self.bars.len()
    }

    pub fn axis_label(&self) -> String {
        format_bytes(self.axis_max)
    }
}

/// Grouped upload / download bars per day.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyChartRenderer;

impl ChartRenderer<DayUsage> for MonthlyChartRenderer {
    type Output = MonthlyChart;

    fn render(&self, days: &[DayUsage]) -> MonthlyChart {
        let axis_max = days
            .iter()
            .map(|d| d.bytes_sent.max(d.bytes_received))
            .max()
            .unwrap_or(0);

        let fraction = |v: u64| {
            if axis_max == 0 {
                0.0
            } else {
                v as f32 / axis_max as f32
            }
        };

        let bars = days
            .iter()
            .map(|d| DayBar {
                label:         d.day_label(),
                upload:        fraction(d.bytes_sent),
                download:      fraction(d.bytes_received),
                upload_text:   format_bytes(d.bytes_sent),
                download_text: format_bytes(d.bytes_received),
            })
            .collect();

        MonthlyChart { bars, axis_max }
    }
}
