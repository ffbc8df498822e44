use iced::{
    widget::{button, container, row, text},
    Alignment, Element, Length,
};
use netdash_core::{event::Message, state::DashboardState};
use std::fmt::Write;

/// Device name, service version, clock and the refresh button.
#[derive(Debug)]
pub struct HeaderWidget {
    clock_format: String,
}

impl HeaderWidget {
    pub fn new(clock_format: impl Into<String>) -> Self {
        Self {
            clock_format: clock_format.into(),
        }
    }

    pub fn view<'a>(&'a self, state: &'a DashboardState) -> Element<'a, Message> {
        let mut identity = row![text(state.device_label().to_string()).size(22)]
            .spacing(10)
            .align_y(Alignment::Center);

        if let Some(health) = &state.health {
            if let Some(version) = &health.version {
                identity = identity.push(text(format!("v{version}")).size(13).style(text::secondary));

                if let Some(released) = health.release_date() {
                    identity = identity.push(
                        text(format!("• Released {released}")).size(13).style(text::secondary),
                    );
                }
            }
            if let Some(count) = health.device_count.filter(|n| *n > 0) {
                let noun = if count == 1 { "device" } else { "devices" };
                identity = identity.push(text(format!("{count} {noun}")).size(13));
            }
        }

        let updated = match state.last_update {
            Some(at) => format!("Updated {}", at.format("%H:%M:%S")),
            None => "Waiting for data…".to_string(),
        };

        let stale = state.stale_endpoints();
        let stale = if stale.is_empty() {
            String::new()
        } else {
            let names: Vec<String> = stale.iter().map(ToString::to_string).collect();
            format!("Stale: {}", names.join(", "))
        };

        row![
            container(identity).width(Length::Fill),
            text(stale).size(12).style(text::danger),
            text(updated).size(12).style(text::secondary),
            text(self.clock(state)).size(18),
            button(text("Refresh")).on_press(Message::RefreshRequested),
        ]
        .spacing(16)
        .align_y(Alignment::Center)
        .into()
    }

    /// Current time in the configured format; an invalid format falls back
    /// to `HH:MM` instead of panicking inside chrono's `Display`.
    fn clock(&self, state: &DashboardState) -> String {
        let mut out = String::new();
        if write!(out, "{}", state.time.format(&self.clock_format)).is_err() {
            out = state.time.format("%H:%M").to_string();
        }
        out
    }
}
