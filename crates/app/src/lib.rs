//! Desktop window for `netdash`.
//!
//! Owns the Iced application loop and wires together all background work:
//! - Poll schedule for `/live`, `/today` and `/summary` (restarted on config change)
//! - On-demand fetches for `/health`, the monthly chart and the refresh button
//! - 1-second timer (clock)

use chrono::Local;
use futures::{channel::mpsc::Sender, SinkExt};
use iced::{
    widget::{column, row, scrollable},
    Element, Length, Size, Subscription, Task,
};
use netdash_api::ApiClient;
use netdash_config::{default_path, load as load_config, ConfigWatcher, DashConfig, PollingConfig};
use netdash_core::{event::Message as AppMessage, DashboardState, Endpoint};
use netdash_poller::{fetch, refresh_endpoints, Cadences, Poller};
use netdash_widgets::{HeaderWidget, LifetimeWidget, LiveWidget, MonthlyWidget, TodayWidget};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Messages buffered between the poll stream and the UI.
const STREAM_CAPACITY: usize = 32;

/// Back-off before a dead poll schedule is started again.
const RESTART_DELAY: Duration = Duration::from_secs(2);

// ── Entry point ───────────────────────────────────────────────────────────────

/// Open the dashboard window. Returns when the window is closed.
pub fn run() -> iced::Result {
    let config = load_or_default(default_path());

    iced::application(Dashboard::new, Dashboard::update, Dashboard::view)
        .title("netdash")
        .subscription(Dashboard::subscription)
        .window_size(Size::new(config.ui.width, config.ui.height))
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
#[derive(Debug, Clone)]
enum Message {
    /// Propagate a core event-bus message.
    App(AppMessage),
    /// The config file changed and validated. The poll schedule already
    /// runs on this exact copy; the UI takes its settings from it too.
    ConfigApplied(Box<DashConfig>),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Dashboard {
    state:    DashboardState,
    config:   DashConfig,
    /// `None` only if the HTTP client could not be built.
    client:   Option<ApiClient>,
    header:   HeaderWidget,
    live:     LiveWidget,
    today:    TodayWidget,
    lifetime: LifetimeWidget,
    monthly:  MonthlyWidget,
}

impl Dashboard {
    fn new() -> (Self, Task<Message>) {
        let dashboard = Self::with_config(load_or_default(default_path()));

        // Device info and the current month are not on a cadence; load them
        // once so the header and chart aren't blank until the first refresh.
        let month = dashboard.state.month;
        let init = dashboard.fetch_all([Endpoint::Health, Endpoint::Month(month)]);

        (dashboard, init)
    }

    fn with_config(config: DashConfig) -> Self {
        Self {
            state:    DashboardState::new(config.chart.window_capacity),
            client:   build_client(&config),
            header:   HeaderWidget::new(config.ui.clock_format.clone()),
            live:     LiveWidget::new(config.chart.window_capacity),
            today:    TodayWidget::new(),
            lifetime: LifetimeWidget::new(),
            monthly:  MonthlyWidget::new(),
            config,
        }
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => self.handle_app(msg),
            Message::ConfigApplied(cfg) => {
                self.apply_config(*cfg);
                Task::none()
            }
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        let now = Local::now();
        match msg {
            AppMessage::LiveUpdated(stats) => self.state.apply_live(stats, now),
            AppMessage::TodayUpdated(stats) => self.state.apply_today(stats, now),
            AppMessage::LifetimeUpdated(stats) => self.state.apply_lifetime(stats, now),
            AppMessage::MonthLoaded(month, usage) => {
                debug!("Loaded {} days for {}", usage.days.len(), month.query_param());
                self.state.apply_month(month, usage);
            }
            AppMessage::HealthLoaded(health) => self.state.apply_health(health, now),
            AppMessage::PollFailed(endpoint) => self.state.record_failure(endpoint),
            AppMessage::RefreshRequested => {
                info!("Manual refresh");
                return self.fetch_all(refresh_endpoints(self.state.month));
            }
            AppMessage::PrevMonth => {
                let month = self.state.prev_month();
                return self.fetch_one(Endpoint::Month(month));
            }
            AppMessage::NextMonth => {
                let month = self.state.next_month();
                return self.fetch_one(Endpoint::Month(month));
            }
            AppMessage::Tick => self.state.time = now,
        }
        Task::none()
    }

    fn apply_config(&mut self, cfg: DashConfig) {
        if cfg.chart.window_capacity != self.config.chart.window_capacity {
            self.state.window.resize(cfg.chart.window_capacity);
            self.live = LiveWidget::new(cfg.chart.window_capacity);
        }
        if cfg.api != self.config.api {
            self.client = build_client(&cfg);
        }
        self.header = HeaderWidget::new(cfg.ui.clock_format.clone());
        self.config = cfg;
    }

    fn fetch_one(&self, endpoint: Endpoint) -> Task<Message> {
        match &self.client {
            Some(client) => {
                let client = client.clone();
                Task::perform(async move { fetch(&client, endpoint).await }, Message::App)
            }
            None => Task::none(),
        }
    }

    fn fetch_all(&self, endpoints: impl IntoIterator<Item = Endpoint>) -> Task<Message> {
        Task::batch(endpoints.into_iter().map(|endpoint| self.fetch_one(endpoint)))
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let cards = row![
            self.live.view(&self.state),
            self.today.view(&self.state),
            self.lifetime.view(&self.state),
        ]
        .spacing(12)
        .width(Length::Fill);

        let page = column![
            self.header.view(&self.state),
            cards,
            self.monthly.view(&self.state),
        ]
        .spacing(16)
        .padding(16);

        let page: Element<'_, AppMessage> = scrollable(page).height(Length::Fill).into();
        page.map(Message::App)
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let tick = iced::time::every(Duration::from_secs(1))
            .map(|_| Message::App(AppMessage::Tick));

        Subscription::batch([tick, Subscription::run(poll_stream)])
    }
}

// ── Poll schedule ─────────────────────────────────────────────────────────────

/// The running [`Poller`] together with the config it was started from.
struct PollSchedule {
    config: DashConfig,
    poller: Poller,
}

impl PollSchedule {
    fn start(config: DashConfig) -> Option<(Self, mpsc::Receiver<AppMessage>)> {
        let client = build_client(&config)?;
        info!("Polling {}", client.base_url());
        let (poller, rx) = Poller::spawn(client, cadences(&config.polling));
        Some((Self { config, poller }, rx))
    }

    /// Cancel every task and spawn the schedule again from the current config.
    fn respawn(&mut self) -> Option<mpsc::Receiver<AppMessage>> {
        let client = build_client(&self.config)?;
        Some(self.poller.restart(client, cadences(&self.config.polling)))
    }

    /// Re-read `path` after a change on disk.
    ///
    /// An unreadable or invalid file leaves the schedule and its config
    /// untouched and returns `None`. Otherwise the schedule is respawned when
    /// the API or cadences changed (`rx` is swapped for the new receiver) and
    /// the loaded config is returned for the UI.
    fn reload(&mut self, path: &Path, rx: &mut mpsc::Receiver<AppMessage>) -> Option<DashConfig> {
        let new = match load_config(path) {
            Ok(new) => new,
            Err(e) => {
                warn!("Ignoring config change: {e}");
                return None;
            }
        };

        if self.config.needs_respawn(&new) {
            let client = build_client(&new)?;
            *rx = self.poller.restart(client, cadences(&new.polling));
        }

        info!("Config reloaded");
        self.config = new.clone();
        Some(new)
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────

/// Runs the poll schedule for the lifetime of the window.
///
/// Also watches `netdash.toml`: a valid change is applied to the schedule
/// first and then handed to the UI, so both run on the same load of the file.
/// Dropping the stream (window closed) drops the [`Poller`], which cancels
/// whatever is still running.
fn poll_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(STREAM_CAPACITY, |mut sender: Sender<Message>| async move {
        let path = default_path();
        let (_watcher, mut changes) = ConfigWatcher::spawn(&path);
        let mut watching = true;

        let Some((mut schedule, mut rx)) = PollSchedule::start(load_or_default(&path)) else {
            // No HTTP client; the window still shows its placeholders.
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        };

        loop {
            tokio::select! {
                polled = rx.recv() => match polled {
                    Some(message) => {
                        if sender.send(Message::App(message)).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        warn!("Poll schedule stopped; restarting in {RESTART_DELAY:?}");
                        tokio::time::sleep(RESTART_DELAY).await;
                        match schedule.respawn() {
                            Some(fresh) => rx = fresh,
                            None => break,
                        }
                    }
                },
                change = changes.recv(), if watching => match change {
                    Some(()) => {
                        if let Some(cfg) = schedule.reload(&path, &mut rx) {
                            if sender.send(Message::ConfigApplied(Box::new(cfg))).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => {
                        warn!("Config watcher stopped; live reload disabled");
                        watching = false;
                    }
                },
            }
        }

        schedule.poller.cancel_all();
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_client(config: &DashConfig) -> Option<ApiClient> {
    match ApiClient::new(config.api.base_url.as_str(), config.api.timeout()) {
        Ok(client) => Some(client),
        Err(e) => {
            error!("Cannot build API client: {e}");
            None
        }
    }
}

fn cadences(polling: &PollingConfig) -> Cadences {
    Cadences {
        live:     Duration::from_millis(polling.live_ms),
        today:    Duration::from_millis(polling.today_ms),
        lifetime: Duration::from_millis(polling.lifetime_ms),
    }
}

/// A broken config file must not keep the window from opening.
fn load_or_default(path: impl AsRef<Path>) -> DashConfig {
    load_config(path).unwrap_or_else(|e| {
        warn!("{e}; using defaults");
        DashConfig::default()
    })
}
