use crate::event::Endpoint;
use crate::format::{format_percent, try_format_bytes};
use crate::model::{Health, LiveStats, MonthUsage, UsageStats};
use crate::month::MonthCursor;
use crate::peak::PeakTracker;
use crate::window::{RollingWindow, Sample};
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Lower bound for the live gauges so idle links don't render as full bars.
pub const GAUGE_FLOOR_BYTES: u64 = 1_000_000;

/// Lifetime totals are spread over this many days for the daily estimate.
pub const AVERAGE_DAYS: f64 = 30.0;

/// Everything the dashboard knows during one session.
///
/// Owned by the application loop; every poll result is applied here in the
/// order it arrives, and widgets only ever read from it.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Rolling live-throughput history for the sparkline.
    pub window: RollingWindow,
    /// Session peak combined throughput.
    pub peak: PeakTracker,
    /// Month shown by the monthly chart.
    pub month: MonthCursor,
    pub live: Option<LiveStats>,
    pub today: Option<UsageStats>,
    pub lifetime: Option<UsageStats>,
    /// Last month payload together with the month it was requested for.
    pub monthly: Option<(MonthCursor, MonthUsage)>,
    pub health: Option<Health>,
    /// `true` once `/health` failed and no later call succeeded.
    pub offline: bool,
    /// Time any endpoint last delivered data.
    pub last_update: Option<DateTime<Local>>,
    /// Current local time (updated every second).
    pub time: DateTime<Local>,
    failures: HashMap<Endpoint, u64>,
}

impl DashboardState {
    pub fn new(window_capacity: usize) -> Self {
        Self {
            window:      RollingWindow::new(window_capacity),
            peak:        PeakTracker::new(),
            month:       MonthCursor::current(),
            live:        None,
            today:       None,
            lifetime:    None,
            monthly:     None,
            health:      None,
            offline:     false,
            last_update: None,
            time:        Local::now(),
            failures:    HashMap::new(),
        }
    }

    // ── Poll results ──────────────────────────────────────────────────────────

    pub fn apply_live(&mut self, stats: LiveStats, at: DateTime<Local>) {
        self.window
            .append(Sample::new(at, stats.bytes_sent, stats.bytes_received));
        self.peak.observe_local(stats.total() as f64);
        self.live = Some(stats);
        self.succeeded(Endpoint::Live, at);
    }

    pub fn apply_today(&mut self, stats: UsageStats, at: DateTime<Local>) {
        self.peak.reconcile(stats.display().peak_speed);
        self.today = Some(stats);
        self.succeeded(Endpoint::Today, at);
    }

    pub fn apply_lifetime(&mut self, stats: UsageStats, at: DateTime<Local>) {
        self.lifetime = Some(stats);
        self.succeeded(Endpoint::Lifetime, at);
    }

    pub fn apply_month(&mut self, month: MonthCursor, usage: MonthUsage) {
        self.failures.remove(&Endpoint::Month(month));
        self.monthly = Some((month, usage));
    }

    pub fn apply_health(&mut self, health: Health, at: DateTime<Local>) {
        self.health = Some(health);
        self.offline = false;
        self.succeeded(Endpoint::Health, at);
    }

    fn succeeded(&mut self, endpoint: Endpoint, at: DateTime<Local>) {
        self.failures.remove(&endpoint);
        self.last_update = Some(at);
    }

    /// Count a failed fetch. Previously displayed values are left untouched.
    pub fn record_failure(&mut self, endpoint: Endpoint) {
        *self.failures.entry(endpoint).or_insert(0) += 1;
        if endpoint == Endpoint::Health {
            self.offline = true;
        }
    }

    /// Failed fetches of `endpoint` since it last delivered data.
    pub fn failures(&self, endpoint: Endpoint) -> u64 {
        self.failures.get(&endpoint).copied().unwrap_or(0)
    }

    /// Polled endpoints whose last fetch failed, so their panel shows old data.
    pub fn stale_endpoints(&self) -> Vec<Endpoint> {
        [Endpoint::Live, Endpoint::Today, Endpoint::Lifetime]
            .into_iter()
            .filter(|e| self.failures(*e) > 0)
            .collect()
    }

    // ── Month navigation ──────────────────────────────────────────────────────

    pub fn prev_month(&mut self) -> MonthCursor {
        self.month = self.month.prev();
        self.month
    }

    pub fn next_month(&mut self) -> MonthCursor {
        self.month = self.month.next();
        self.month
    }

    // ── Derived readouts ──────────────────────────────────────────────────────

    /// Hostname, `"Offline"` after a failed health check, or `"Connecting…"`.
    pub fn device_label(&self) -> &str {
        if self.offline {
            return "Offline";
        }
        self.health
            .as_ref()
            .map(|h| h.hostname.as_str())
            .unwrap_or("Connecting…")
    }

    /// Upload / download gauge fill in `[0, 1]`, scaled to the faster
    /// direction but never below [`GAUGE_FLOOR_BYTES`].
    pub fn live_gauges(&self) -> (f32, f32) {
        let Some(live) = &self.live else {
            return (0.0, 0.0);
        };
        let max = live
            .bytes_sent
            .max(live.bytes_received)
            .max(GAUGE_FLOOR_BYTES) as f32;
        (live.bytes_sent as f32 / max, live.bytes_received as f32 / max)
    }

    /// Today's device-local upload / download share, e.g. `("25.0%", "75.0%")`.
    pub fn traffic_split(&self) -> Option<(String, String)> {
        let today = self.today.as_ref()?;
        let total = today.bytes_sent.saturating_add(today.bytes_received);
        Some((
            format_percent(today.bytes_sent, total)?,
            format_percent(today.bytes_received, total)?,
        ))
    }

    /// Rough average daily usage: the lifetime total over [`AVERAGE_DAYS`].
    pub fn average_daily(&self) -> Option<String> {
        let lifetime = self.lifetime.as_ref()?;
        try_format_bytes(lifetime.total() as f64 / AVERAGE_DAYS).ok()
    }

    pub fn is_global_today(&self) -> bool {
        self.today.as_ref().is_some_and(UsageStats::is_global)
    }

    pub fn is_global_lifetime(&self) -> bool {
        self.lifetime.as_ref().is_some_and(UsageStats::is_global)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(30)
    }
}
