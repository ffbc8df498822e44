use crate::card;
use iced::{
    widget::{button, column, container, row, scrollable, text, Column},
    Alignment, Element, Font, Length,
};
use netdash_core::{event::Message, state::DashboardState};
use netdash_renderer::{ChartRenderer, DayBar, MonthlyChartRenderer};

/// Longest bar, in monospace cells.
const BAR_CELLS: usize = 40;

/// Per-day usage for the selected month, with month navigation.
#[derive(Debug, Default)]
pub struct MonthlyWidget {
    renderer: MonthlyChartRenderer,
}

impl MonthlyWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view<'a>(&'a self, state: &'a DashboardState) -> Element<'a, Message> {
        let nav = row![
            button(text("‹")).on_press(Message::PrevMonth),
            container(text(state.month.display()).size(15))
                .width(Length::Fill)
                .center_x(Length::Fill),
            button(text("›")).on_press(Message::NextMonth),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let mut body = Column::new().push(nav).spacing(8);

        match &state.monthly {
            None => {
                body = body.push(text("Loading…").size(13).style(text::secondary));
            }
            Some((month, usage)) => {
                let chart = self.renderer.render(&usage.days);

                if *month != state.month {
                    body = body.push(
                        text(format!("Showing {}", month.display()))
                            .size(12)
                            .style(text::secondary),
                    );
                }

                let rows = chart.bars.iter().map(day_row);
                body = body.push(
                    scrollable(Column::with_children(rows).spacing(2)).height(Length::Fixed(260.0)),
                );
                body = body.push(
                    text(format!(
                        "{} data points · scale {}",
                        chart.data_points(),
                        chart.axis_label()
                    ))
                    .size(11)
                    .style(text::secondary),
                );
            }
        }

        card("Monthly", None, body)
    }
}

fn day_row<'a>(bar: &DayBar) -> Element<'a, Message> {
    row![
        text(format!("{:>2}", bar.label)).font(Font::MONOSPACE).size(12),
        column![
            text(format!("{} {}", cells(bar.upload), bar.upload_text))
                .font(Font::MONOSPACE)
                .size(11)
                .style(text::primary),
            text(format!("{} {}", cells(bar.download), bar.download_text))
                .font(Font::MONOSPACE)
                .size(11)
                .style(text::success),
        ],
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Text bar of up to [`BAR_CELLS`] blocks; non-zero values get at least one.
fn cells(fraction: f32) -> String {
    let n = (fraction.clamp(0.0, 1.0) * BAR_CELLS as f32).round() as usize;
    let n = if fraction > 0.0 { n.max(1) } else { 0 };
    "█".repeat(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_scale_to_bar_width() {
        assert_eq!(cells(0.0), "");
        assert_eq!(cells(1.0).chars().count(), BAR_CELLS);
        assert_eq!(cells(0.5).chars().count(), BAR_CELLS / 2);
        assert_eq!(cells(0.001).chars().count(), 1);
    }
}
