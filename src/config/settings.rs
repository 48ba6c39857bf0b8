//! Configuration settings for Pairwatch.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exchange configuration.
    pub exchange: ExchangeConfig,
    /// Price tracker configuration.
    pub tracker: TrackerConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// Theme configuration.
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from file, returning default if file doesn't exist.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Exchange configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// REST API base URL.
    pub base_url: String,
    /// Quote currency suffix every listed symbol must end with.
    pub quote_asset: String,
    /// Status marker of symbols that are currently tradable.
    pub trading_status: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Rate limit (requests per second).
    pub rate_limit: u32,
}

impl ExchangeConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
            trading_status: "TRADING".to_string(),
            timeout_secs: 10,
            rate_limit: 5,
        }
    }
}

/// Price tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Seconds to wait between two price refreshes.
    pub poll_interval_secs: u64,
}

impl TrackerConfig {
    /// Poll interval as a duration, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI redraws.
    pub tick_rate_ms: u64,
    /// Enable Unicode symbols.
    pub unicode_symbols: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            unicode_symbols: true,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Check/uncheck the symbol under the cursor.
    pub toggle: String,
    /// Confirm the selection and start tracking.
    pub confirm: String,
    /// Return from tracking to selection.
    pub back: String,
    /// Start typing a search query.
    pub search: String,
    /// Retry a failed catalog fetch.
    pub retry: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            toggle: "Space".to_string(),
            confirm: "Enter".to_string(),
            back: "Esc".to_string(),
            search: "/".to_string(),
            retry: "r".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Colour of a price that went up (hex).
    pub up: String,
    /// Colour of a price that went down (hex).
    pub down: String,
    /// Colour of an unchanged or first price (hex).
    pub neutral: String,
    /// Border color (hex).
    pub border: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            up: "#66bb6a".to_string(),
            down: "#ef5350".to_string(),
            neutral: "#ffffff".to_string(),
            border: "#45475a".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.exchange.quote_asset, "USDT");
        assert_eq!(config.exchange.trading_status, "TRADING");
        assert_eq!(config.tracker.poll_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [exchange]
            quote_asset = "USDC"

            [tracker]
            poll_interval_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.exchange.quote_asset, "USDC");
        assert_eq!(config.exchange.base_url, "https://api.binance.com");
        assert_eq!(config.tracker.poll_interval_secs, 3);
        assert_eq!(config.keybindings.confirm, "Enter");
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = Config::from_toml("[tracker]\npoll_interval_secs = 0").unwrap();
        assert_eq!(config.tracker.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("[tracker]\npoll_interval_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_missing_file_yields_default() {
        let path = std::env::temp_dir().join("pairwatch-does-not-exist/config.toml");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.ui.tick_rate_ms, 250);
    }
}
