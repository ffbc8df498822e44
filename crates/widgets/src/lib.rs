pub mod header;
pub mod lifetime;
pub mod live;
pub mod monthly;
pub mod today;

pub use header::HeaderWidget;
pub use lifetime::LifetimeWidget;
pub use live::LiveWidget;
pub use monthly::MonthlyWidget;
pub use today::TodayWidget;

use iced::{
    widget::{column, container, row, text, Column},
    Alignment, Element, Length,
};
use netdash_core::event::Message;

/// Placeholder for a readout that has not loaded yet.
pub(crate) const PENDING: &str = "—";

/// Titled panel with an optional badge in the top-right corner.
pub(crate) fn card<'a>(
    title: &'static str,
    badge: Option<&'static str>,
    body: Column<'a, Message>,
) -> Element<'a, Message> {
    let mut header = row![container(text(title).size(16)).width(Length::Fill)]
        .align_y(Alignment::Center);
    if let Some(badge) = badge {
        header = header.push(text(badge).size(12).style(text::secondary));
    }

    container(column![header, body].spacing(10))
        .padding(14)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// `label ........ value` line inside a card.
pub(crate) fn stat_row<'a>(label: &'static str, value: String) -> Element<'a, Message> {
    row![
        container(text(label).size(13)).width(Length::Fill),
        text(value).size(15),
    ]
    .align_y(Alignment::Center)
    .into()
}
