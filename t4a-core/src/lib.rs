//! T4A Core - CSV import and validation for T4A slips
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: slip records, the field table, currency and summary totals
//! - **ports**: trait definitions for external inputs (CsvSource)
//! - **services**: column resolution, slip building, validation, import sessions
//! - **adapters**: concrete implementations (CSV files on disk)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};

use anyhow::Result;

use config::Config;
use services::ImportService;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{RecipientType, SlipDraft, SlipField, SlipSummary};
pub use services::{ImportOutcome, ImportSession};

/// Main context for T4A operations
///
/// Holds the loaded configuration and the services that need the app
/// directory.
pub struct T4aContext {
    pub app_dir: PathBuf,
    pub config: Config,
    pub import_service: ImportService,
}

impl T4aContext {
    pub fn new(app_dir: &Path) -> Result<Self> {
        let config = Config::load(app_dir)?;
        let import_service = ImportService::new(app_dir.to_path_buf());

        Ok(Self {
            app_dir: app_dir.to_path_buf(),
            config,
            import_service,
        })
    }

    /// Payer BN from an explicit value, else `T4A_PAYER_BN`, else settings,
    /// else empty
    pub fn payer_bn(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(config::env_payer_bn)
            .or_else(|| self.config.payer_bn.clone())
            .unwrap_or_default()
    }
}
