//! Configuration module for netstats-rs
//!
//! This module handles dashboard configuration:
//! - Refresh cadence of the view worker
//! - Which columns are shown and in what order
//! - The initial sort order
//! - The block explorer used for address links
//!
//! # Config Location
//!
//! Unless a path is given explicitly, the config is read from the
//! platform-appropriate config directory:
//! - **Linux**: `~/.config/netstats-rs/config.toml`
//! - **macOS**: `~/Library/Application Support/netstats-rs/config.toml`
//! - **Windows**: `%APPDATA%\netstats-rs\config.toml`
//!
//! A missing file means defaults.
//!
//! # Example
//!
//! ```toml
//! columns = ["Status", "Name", "Block", "Block Time", "Peers"]
//! explorer_url = "https://explorer.example.org"
//!
//! [refresh]
//! focused_tick_ms = 50
//! unfocused_tick_ms = 1000
//! full_refresh_ms = 1000
//!
//! [sort.active]
//! column = "Block"
//! direction = "descending"
//!
//! [sort.secondary]
//! column = "Name"
//! ```

pub mod settings;

pub use settings::*;

use crate::columns::ColumnLayout;
use crate::error::{NetStatsError, Result, ResultExt};
use crate::pipeline::SortDescriptor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "netstats-rs";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Tick period while the host view is focused
pub const DEFAULT_FOCUSED_TICK_MS: u64 = 50;

/// Tick period while the host view is visible but not focused
pub const DEFAULT_UNFOCUSED_TICK_MS: u64 = 1000;

/// Period of forced full refreshes
pub const DEFAULT_FULL_REFRESH_MS: u64 = 1000;

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Refresh cadence of the view worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub focused_tick_ms: u64,
    pub unfocused_tick_ms: u64,
    /// Every row is recomputed at least this often so that time-based
    /// cells (block age) keep moving
    pub full_refresh_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            focused_tick_ms: DEFAULT_FOCUSED_TICK_MS,
            unfocused_tick_ms: DEFAULT_UNFOCUSED_TICK_MS,
            full_refresh_ms: DEFAULT_FULL_REFRESH_MS,
        }
    }
}

impl RefreshConfig {
    /// Tick period for the given focus state
    pub fn tick_interval(&self, focused: bool) -> Duration {
        Duration::from_millis(if focused {
            self.focused_tick_ms
        } else {
            self.unfocused_tick_ms
        })
    }

    pub fn full_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.full_refresh_ms)
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Visible columns in display order; empty means every default column
    pub columns: Vec<String>,
    /// Block explorer base URL for address links
    pub explorer_url: Option<String>,
    pub refresh: RefreshConfig,
    /// Sort order when the dashboard opens
    pub sort: SortDescriptor,
}

impl DashboardConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| NetStatsError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save to a file as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| NetStatsError::Serialization(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Check cadences and column names
    pub fn validate(&self) -> Result<()> {
        let refresh = &self.refresh;
        if refresh.focused_tick_ms == 0 || refresh.unfocused_tick_ms == 0 {
            return Err(NetStatsError::Config(
                "tick periods must be greater than zero".to_string(),
            ));
        }
        if refresh.full_refresh_ms == 0 {
            return Err(NetStatsError::Config(
                "full_refresh_ms must be greater than zero".to_string(),
            ));
        }
        let layout = self.layout()?;
        for key in [&self.sort.active, &self.sort.secondary] {
            if crate::columns::find(&key.column).is_none() {
                return Err(NetStatsError::UnknownColumn(key.column.clone()));
            }
            if layout.index_of(&key.column).is_none() {
                tracing::warn!("Sort column {:?} is not visible; it will be ignored", key.column);
            }
        }
        Ok(())
    }

    /// Column layout described by this config
    pub fn layout(&self) -> Result<ColumnLayout> {
        Ok(ColumnLayout::from_names(&self.columns)?.with_explorer(self.explorer_url.clone()))
    }

    /// Initial runtime settings derived from this config
    pub fn initial_settings(&self) -> ViewSettings {
        ViewSettings {
            sort: self.sort.clone(),
            ..Default::default()
        }
    }
}
