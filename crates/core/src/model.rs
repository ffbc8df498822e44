//! JSON shapes returned by the monitoring service's local HTTP API.
//!
//! Every optional field defaults to absent so older service versions (no
//! cost data, no multi-device `global` block) still parse.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// `GET /api/health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hostname: String,
    #[serde(default)]
    pub version: Option<String>,
    /// ISO-8601 timestamp; shown as the release date.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub device_count: Option<u32>,
}

impl Health {
    /// Release date formatted like `"Mar 5, 2024"`, if the timestamp parses.
    pub fn release_date(&self) -> Option<String> {
        let raw = self.timestamp.as_deref()?.trim();
        let date = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()?;
        Some(date.format("%b %-d, %Y").to_string())
    }
}

/// Server-side formatted figures. Kept for completeness; the dashboard
/// re-formats from the raw byte counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanReadable {
    pub sent: String,
    pub received: String,
    pub total: Option<String>,
    pub peak_speed: Option<String>,
}

/// `GET /api/live` — current rates in bytes/second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStats {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    #[serde(default)]
    pub human_readable: Option<HumanReadable>,
}

impl LiveStats {
    pub fn total(&self) -> u64 {
        self.bytes_sent.saturating_add(self.bytes_received)
    }
}

/// `GET /api/today` and `GET /api/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    #[serde(default)]
    pub total_bytes: Option<u64>,
    #[serde(default)]
    pub human_readable: Option<HumanReadable>,
    /// Only kept when the service sent an actual number.
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub peak_speed: Option<f64>,
    #[serde(default)]
    pub cost: Option<CostBreakdown>,
    /// Same figures aggregated across every device syncing to the account.
    #[serde(default)]
    pub global: Option<Box<UsageStats>>,
}

impl UsageStats {
    /// The aggregate figures when the service provides them, else the
    /// device-local ones.
    pub fn display(&self) -> &UsageStats {
        self.global.as_deref().unwrap_or(self)
    }

    pub fn is_global(&self) -> bool {
        self.global.is_some()
    }

    pub fn total(&self) -> u64 {
        self.total_bytes
            .unwrap_or_else(|| self.bytes_sent.saturating_add(self.bytes_received))
    }

    /// Formatted total cost, e.g. `"₹12.34"`.
    pub fn total_cost(&self) -> Option<&str> {
        self.cost
            .as_ref()?
            .total
            .as_ref()
            .map(|c| c.cost_formatted.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostBreakdown {
    pub upload: Option<CostEntry>,
    pub download: Option<CostEntry>,
    pub total: Option<CostEntry>,
    pub cost_per_gb: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostEntry {
    pub gb_used: f64,
    pub cost_inr: f64,
    pub cost_formatted: String,
}

/// `GET /api/month?month=YYYY-MM`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthUsage {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub days: Vec<DayUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayUsage {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    #[serde(default)]
    pub total_bytes: Option<u64>,
}

impl DayUsage {
    /// Day of month for the chart axis; falls back to the raw date string.
    pub fn day_label(&self) -> String {
        use chrono::Datelike;
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map(|d| d.day().to_string())
            .unwrap_or_else(|_| self.date.clone())
    }

    pub fn total(&self) -> u64 {
        self.total_bytes
            .unwrap_or_else(|| self.bytes_sent.saturating_add(self.bytes_received))
    }
}

/// Accept any JSON number; treat strings, booleans, objects and `null` as absent.
fn numeric_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum Lenient {
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) if n.is_finite() => Some(n),
        _ => None,
    })
}
