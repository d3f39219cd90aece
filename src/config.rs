//! Configuration persistence
//!
//! Stores defaults in `~/.config/livegrid/config.yaml`:
//!
//! ```yaml
//! base_url: http://localhost:8080/
//! requests:
//!   orders_request: /orders/rows
//!   status: /status
//! grid:
//!   page_size: 20
//!   large_buffer_size: 7.0
//!   small_buffer_size: 1.0
//!   near_limit_factor: 0.2
//! timing:
//!   fetch_timeout_ms: 4000
//!   scroll_idle_ms: 1200
//! http:
//!   timeout_ms: 10000
//! format: table
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::{BufferRatios, OutputFormat, SCROLL_IDLE_MS};
use crate::model::FETCH_TIMEOUT_MS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub page_size: usize,
    /// Visible table height in pixels; defaults to 20px per row
    pub visible_height: Option<f64>,
    #[serde(flatten)]
    pub ratios: BufferRatios,
    pub prefetch_buffer: bool,
    pub snap_to_rows: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            visible_height: None,
            ratios: BufferRatios::default(),
            prefetch_buffer: false,
            snap_to_rows: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fetch_timeout_ms: u64,
    pub scroll_idle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            scroll_idle_ms: SCROLL_IDLE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Settings that persist across sessions. Command-line flags override them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveGridConfig {
    /// Base for relative request URLs
    pub base_url: Option<String>,
    /// Logical request name -> URL, registered at startup
    pub requests: BTreeMap<String, String>,
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub http: HttpConfig,
    pub format: OutputFormat,
}

impl LiveGridConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load from a specific file; any failure falls back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk, creating the parent directory if needed
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
