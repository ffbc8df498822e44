pub mod schema;
pub mod watcher;

pub use schema::{ApiConfig, ChartConfig, DashConfig, PollingConfig, UiConfig};
pub use watcher::ConfigWatcher;

use netdash_core::{DashError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `DashConfig::default()` if
/// the file doesn't exist so the dashboard always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<DashConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DashConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DashError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: DashConfig =
        toml::from_str(&raw).map_err(|e| DashError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject values the scheduler and the rolling window cannot work with.
pub fn validate(config: &DashConfig) -> Result<()> {
    let cadences = [
        ("polling.live_ms", config.polling.live_ms),
        ("polling.today_ms", config.polling.today_ms),
        ("polling.lifetime_ms", config.polling.lifetime_ms),
    ];
    for (key, value) in cadences {
        if value == 0 {
            return Err(DashError::Config(format!("{key} must be greater than 0")));
        }
    }

    if config.chart.window_capacity == 0 {
        return Err(DashError::Config(
            "chart.window_capacity must be at least 1".into(),
        ));
    }

    let base = config.api.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(DashError::Config(format!(
            "api.base_url must be an http(s) URL, got '{base}'"
        )));
    }

    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("netdash").join("netdash.toml")
}
