use crate::{card, stat_row, PENDING};
use iced::{
    widget::{column, text},
    Element,
};
use netdash_core::{event::Message, format::format_bytes, state::DashboardState};

/// All-time totals, cost and the average-per-day estimate.
#[derive(Debug, Default)]
pub struct LifetimeWidget;

impl LifetimeWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a DashboardState) -> Element<'a, Message> {
        let Some(lifetime) = &state.lifetime else {
            return card("Lifetime", None, column![text(PENDING).size(15)]);
        };
        let shown = lifetime.display();

        let mut body = column![
            stat_row("Upload", format_bytes(shown.bytes_sent)),
            stat_row("Download", format_bytes(shown.bytes_received)),
            stat_row("Total", format_bytes(shown.total())),
        ]
        .spacing(6);

        if let Some(cost) = shown.total_cost() {
            body = body.push(stat_row("Cost", cost.to_string()));
        }
        if let Some(avg) = state.average_daily() {
            body = body.push(stat_row("Avg / day", avg));
        }

        let badge = if state.is_global_lifetime() { "Total Network" } else { "This Device" };
        card("Lifetime", Some(badge), body)
    }
}
