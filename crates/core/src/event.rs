use crate::model::{Health, LiveStats, MonthUsage, UsageStats};
use crate::month::MonthCursor;

/// A single HTTP endpoint of the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Live,
    Today,
    Lifetime,
    Month(MonthCursor),
}

impl Endpoint {
    /// Path relative to the API base URL, without query string.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Health   => "health",
            Endpoint::Live     => "live",
            Endpoint::Today    => "today",
            Endpoint::Lifetime => "summary",
            Endpoint::Month(_) => "month",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Month(m) => write!(f, "/month?month={}", m.query_param()),
            other => write!(f, "/{}", other.path()),
        }
    }
}

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Poll scheduler        → `*Updated`, `PollFailed`
/// - On-demand fetches     → `HealthLoaded`, `MonthLoaded`, `PollFailed`
/// - Timer subscription    → `Tick`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Poll results ──────────────────────────────────────────────────────────
    /// Fresh `/live` throughput reading.
    LiveUpdated(LiveStats),
    /// Fresh `/today` totals.
    TodayUpdated(UsageStats),
    /// Fresh `/summary` lifetime totals.
    LifetimeUpdated(UsageStats),
    /// Per-day usage for the month the request was issued for.
    MonthLoaded(MonthCursor, MonthUsage),
    /// Device / service info from `/health`.
    HealthLoaded(Health),
    /// A fetch failed; the error has already been logged.
    PollFailed(Endpoint),

    // ── User actions ──────────────────────────────────────────────────────────
    /// Refresh button — fetch everything once, outside the cadences.
    RefreshRequested,
    /// Step the monthly chart back one month.
    PrevMonth,
    /// Step the monthly chart forward one month.
    NextMonth,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// One-second timer tick — used to update the clock.
    Tick,
}
