use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure parsed from `netdash.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashConfig {
    /// Where the monitoring service lives.
    pub api: ApiConfig,
    /// Refresh cadences.
    pub polling: PollingConfig,
    /// Live chart settings.
    pub chart: ChartConfig,
    /// Window / display settings.
    pub ui: UiConfig,
}

impl DashConfig {
    /// Whether switching to `new` means the poll schedule has to be torn down
    /// and respawned. Chart and UI settings are applied in place.
    pub fn needs_respawn(&self, new: &DashConfig) -> bool {
        self.api != new.api || self.polling != new.polling
    }
}

/// Monitoring service connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the JSON API, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in milliseconds. `None` = no timeout.
    pub timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url:   "http://127.0.0.1:7373/api".to_string(),
            timeout_ms: Some(10_000),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// How often each endpoint is polled, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// `/live` — throughput readout and sparkline.
    pub live_ms: u64,
    /// `/today` — daily totals, cost and server peak.
    pub today_ms: u64,
    /// `/summary` — lifetime totals.
    pub lifetime_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            live_ms:     2_000,
            today_ms:    30_000,
            lifetime_ms: 60_000,
        }
    }
}

/// Live throughput chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Number of samples kept in the rolling window.
    pub window_capacity: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { window_capacity: 30 }
    }
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// `strftime` format string for the header clock.
    pub clock_format: String,
    /// Initial window width in logical pixels.
    pub width: f32,
    /// Initial window height in logical pixels.
    pub height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            clock_format: "%H:%M".to_string(),
            width:        960.0,
            height:       720.0,
        }
    }
}
