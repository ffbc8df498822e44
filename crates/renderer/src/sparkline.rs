use crate::ChartRenderer;
use netdash_core::format::format_speed;
use netdash_core::Sample;

/// Eight-level block glyphs, lowest first.
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Upload / download history as two rows of block glyphs on a shared scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sparkline {
    pub upload:   String,
    pub download: String,
    /// Highest single-direction rate in the window; the top of the scale.
    pub scale_max: u64,
    /// Time label of the oldest sample shown.
    pub from: Option<String>,
    /// Time label of the newest sample shown.
    pub to: Option<String>,
}

impl Sparkline {
    pub fn is_empty(&self) -> bool {
        self.from.is_none()
    }

    /// Scale label, e.g. `"max 1.20 MB/s"`.
    pub fn scale_label(&self) -> String {
        format!("max {}", format_speed(self.scale_max as f64))
    }
}

/// Renders the rolling window right-aligned in a fixed number of columns,
/// so the line grows in from the right until the window is full.
#[derive(Debug, Clone, Copy)]
pub struct SparklineRenderer {
    width: usize,
}

impl SparklineRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl ChartRenderer<Sample> for SparklineRenderer {
    type Output = Sparkline;

    fn render(&self, samples: &[Sample]) -> Sparkline {
        let shown = &samples[samples.len().saturating_sub(self.width)..];
        let scale_max = shown
            .iter()
            .map(|s| s.upload_bytes_per_sec.max(s.download_bytes_per_sec))
            .max()
            .unwrap_or(0);

        let pad = " ".repeat(self.width - shown.len());
        let row = |pick: fn(&Sample) -> u64| -> String {
            let mut out = pad.clone();
            out.extend(shown.iter().map(|s| glyph(pick(s), scale_max)));
            out
        };

        Sparkline {
            upload:   row(|s| s.upload_bytes_per_sec),
            download: row(|s| s.download_bytes_per_sec),
            scale_max,
            from: shown.first().map(Sample::label),
            to:   shown.last().map(Sample::label),
        }
    }
}

fn glyph(value: u64, max: u64) -> char {
    if max == 0 {
        return LEVELS[0];
    }
    let top = (LEVELS.len() - 1) as f64;
    let level = (value as f64 / max as f64 * top).round() as usize;
    LEVELS[level.min(LEVELS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local};

    fn sample(secs: i64, up: u64, down: u64) -> Sample {
        let ts: DateTime<Local> = DateTime::from_timestamp(1_700_000_000 + secs, 0)
            .unwrap()
            .with_timezone(&Local);
        Sample::new(ts, up, down)
    }

    #[test]
    fn empty_snapshot_renders_blank_chart() {
        let chart = SparklineRenderer::new(5).render(&[]);
        assert!(chart.is_empty());
        assert_eq!(chart.upload, "     ");
        assert_eq!(chart.download, "     ");
        assert_eq!(chart.scale_max, 0);
    }

    #[test]
    fn short_history_is_right_aligned() {
        let chart = SparklineRenderer::new(4).render(&[sample(0, 0, 700), sample(2, 700, 350)]);
        assert_eq!(chart.upload, "  ▁█");
        assert_eq!(chart.download, "  █▅");
        assert_eq!(chart.scale_max, 700);
        assert!(!chart.is_empty());
    }

    #[test]
    fn long_history_keeps_newest_columns() {
        let samples: Vec<_> = (0..6).map(|i| sample(i, i as u64, 0)).collect();
        let chart = SparklineRenderer::new(3).render(&samples);
        assert_eq!(chart.upload.chars().count(), 3);
        assert_eq!(chart.from, Some(samples[3].label()));
        assert_eq!(chart.to, Some(samples[5].label()));
    }

    #[test]
    fn all_zero_window_stays_on_baseline() {
        let chart = SparklineRenderer::new(2).render(&[sample(0, 0, 0), sample(1, 0, 0)]);
        assert_eq!(chart.upload, "▁▁");
        assert_eq!(chart.scale_label(), "max 0 B/s");
    }
}
