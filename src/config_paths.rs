//! Where livegrid keeps its saved settings and log files
//!
//! Everything sits in one per-user directory: `$XDG_CONFIG_HOME/livegrid`
//! (or `~/.config/livegrid`) on Unix, `%APPDATA%\livegrid` on Windows.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const APP_DIR: &str = "livegrid";

/// Log files are named `<prefix>.<date>` by the daily appender
pub const LOG_FILE_PREFIX: &str = "livegrid.log";

/// Per-user livegrid directory, `None` when no home can be found
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// Saved grid settings and named requests
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Log file currently being written to
pub fn log_file() -> Option<PathBuf> {
    newest_log_in(&logs_dir()?)
}

/// Newest `livegrid.log.*` in `dir`, or the bare prefix path when the
/// directory holds none yet. `None` if `dir` cannot be read.
fn newest_log_in(dir: &Path) -> Option<PathBuf> {
    let newest = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
        })
        // date suffixes order lexically
        .max();

    Some(newest.unwrap_or_else(|| dir.join(LOG_FILE_PREFIX)))
}

fn create(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))
}

/// Create the livegrid directory if needed
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("no home or config directory for this user")?;
    create(&dir)?;
    Ok(dir)
}

/// Create the logs directory if needed
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = ensure_config_dir()?.join("logs");
    create(&logs)?;
    Ok(logs)
}
