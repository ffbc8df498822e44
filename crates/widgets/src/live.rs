use crate::{card, stat_row, PENDING};
use iced::{
    widget::{column, progress_bar, row, text},
    Alignment, Element, Font,
};
use netdash_core::{event::Message, format::format_speed, state::DashboardState};
use netdash_renderer::{ChartRenderer, SparklineRenderer};

/// Live upload / download rates, gauges, sparkline and session peak.
#[derive(Debug)]
pub struct LiveWidget {
    sparkline: SparklineRenderer,
}

impl LiveWidget {
    /// `width` is the number of sparkline columns (the rolling window size).
    pub fn new(width: usize) -> Self {
        Self {
            sparkline: SparklineRenderer::new(width),
        }
    }

    pub fn view<'a>(&'a self, state: &'a DashboardState) -> Element<'a, Message> {
        let (upload, download) = match &state.live {
            Some(live) => (
                format_speed(live.bytes_sent as f64),
                format_speed(live.bytes_received as f64),
            ),
            None => (PENDING.to_string(), PENDING.to_string()),
        };
        let (up_fill, down_fill) = state.live_gauges();

        let chart = self.sparkline.render(&state.window.snapshot());
        let span = match (&chart.from, &chart.to) {
            (Some(from), Some(to)) => format!("{from} – {to} · {}", chart.scale_label()),
            _ => "collecting samples…".to_string(),
        };

        let body = column![
            stat_row("↑ Upload", upload),
            progress_bar(0.0..=1.0, up_fill),
            stat_row("↓ Download", download),
            progress_bar(0.0..=1.0, down_fill),
            row![
                text("↑").size(13),
                text(chart.upload).font(Font::MONOSPACE).size(13),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
            row![
                text("↓").size(13),
                text(chart.download).font(Font::MONOSPACE).size(13),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
            text(span).size(11).style(text::secondary),
            stat_row("Peak", format_speed(state.peak.value())),
        ]
        .spacing(6);

        card("Live", None, body)
    }
}
