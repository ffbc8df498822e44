use crate::{card, stat_row, PENDING};
use iced::{
    widget::{column, text},
    Element,
};
use netdash_core::{event::Message, format::format_bytes, state::DashboardState};

/// Today's sent / received / total, cost and upload-download split.
#[derive(Debug, Default)]
pub struct TodayWidget;

impl TodayWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a DashboardState) -> Element<'a, Message> {
        let Some(today) = &state.today else {
            return card("Today", None, column![text(PENDING).size(15)]);
        };
        let shown = today.display();

        let mut body = column![
            stat_row("Upload", format_bytes(shown.bytes_sent)),
            stat_row("Download", format_bytes(shown.bytes_received)),
            stat_row("Total", format_bytes(shown.total())),
        ]
        .spacing(6);

        if let Some(cost) = shown.total_cost() {
            body = body.push(stat_row("Cost", cost.to_string()));
        }
        if let Some((up, down)) = state.traffic_split() {
            body = body.push(stat_row("Split", format!("↑ {up}  ↓ {down}")));
        }

        let badge = if state.is_global_today() { "Total Network" } else { "This Device" };
        card("Today", Some(badge), body)
    }
}
