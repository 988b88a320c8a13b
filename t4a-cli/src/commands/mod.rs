//! CLI command implementations

pub mod fields;
pub mod import;
pub mod logs;
pub mod totals;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use t4a_core::services::{LogEvent, LoggingService};
use t4a_core::{SlipDraft, T4aContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize; logging never blocks a command.
pub fn get_logger() -> Option<LoggingService> {
    let app_dir = get_app_dir().ok()?;
    LoggingService::new(&app_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// App directory from `T4A_DIR`, else `~/.t4a`
pub fn get_app_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("T4A_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".t4a"))
}

pub fn get_context() -> Result<T4aContext> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create app directory: {:?}", app_dir))?;
    T4aContext::new(&app_dir).context("Failed to load settings")
}

/// Read a slip collection file; a missing file is an empty collection
pub fn load_slips(path: &Path) -> Result<Vec<SlipDraft>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a slip collection", path.display()))
}

pub fn save_slips(path: &Path, slips: &[SlipDraft]) -> Result<()> {
    let content = serde_json::to_string_pretty(slips)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
