//! Configuration management
//!
//! Settings live in `settings.json` inside the app directory:
//! ```json
//! {
//!   "payer": { "bn": "123456789RP0001" },
//!   "importProfiles": {
//!     "profiles": {
//!       "payroll": { "columnMappings": { "Last": "recipientName.snm" } }
//!     }
//!   }
//! }
//! ```
//! Keys this crate does not manage are kept as-is on save.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the payer account number
pub const PAYER_BN_ENV: &str = "T4A_PAYER_BN";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    payer: PayerSettings,
    #[serde(default)]
    import_profiles: ImportProfilesContainer,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bn: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportProfilesContainer {
    #[serde(default)]
    profiles: BTreeMap<String, ImportProfile>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Application configuration (the managed view of settings.json)
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Payer's account number stamped onto every imported slip
    pub payer_bn: Option<String>,
    pub import_profiles: BTreeMap<String, ImportProfile>,
}

impl Config {
    /// Load config from the app directory
    ///
    /// Only what is in settings.json; see [`env_payer_bn`] for the override.
    /// A missing or unreadable settings file yields defaults.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let raw = read_settings(app_dir)?;

        Ok(Self {
            payer_bn: raw.payer.bn,
            import_profiles: raw.import_profiles.profiles,
        })
    }

    /// Save config to the app directory, preserving unmanaged settings
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let mut settings = read_settings(app_dir)?;

        settings.payer.bn = self.payer_bn.clone();
        settings.import_profiles.profiles = self.import_profiles.clone();

        std::fs::create_dir_all(app_dir)
            .with_context(|| format!("Failed to create {}", app_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(app_dir.join("settings.json"), content)
            .context("Failed to write settings.json")?;
        Ok(())
    }

    pub fn profile(&self, name: &str) -> Option<&ImportProfile> {
        self.import_profiles.get(name)
    }

    /// Insert or replace a named profile
    pub fn set_profile(&mut self, name: impl Into<String>, profile: ImportProfile) {
        self.import_profiles.insert(name.into(), profile);
    }
}

/// Payer BN from the `T4A_PAYER_BN` environment variable, if set and non-blank
pub fn env_payer_bn() -> Option<String> {
    std::env::var(PAYER_BN_ENV)
        .ok()
        .map(|bn| bn.trim().to_string())
        .filter(|bn| !bn.is_empty())
}

fn read_settings(app_dir: &Path) -> Result<SettingsFile> {
    let settings_path = app_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

/// Saved column mapping overrides for a recurring CSV layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProfile {
    /// Header text to dotted field path. An empty path unmaps the column.
    pub column_mappings: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.import_profiles.is_empty());
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme":"dark","payer":{"name":"ACME"},"importProfiles":{"legacy":true}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        let mut mappings = BTreeMap::new();
        mappings.insert("Last".to_string(), "recipientName.snm".to_string());
        config.set_profile(
            "payroll",
            ImportProfile {
                column_mappings: mappings,
                description: Some("Monthly payroll export".to_string()),
            },
        );
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["payer"]["name"], "ACME");
        assert_eq!(json["importProfiles"]["legacy"], true);
        assert_eq!(
            json["importProfiles"]["profiles"]["payroll"]["columnMappings"]["Last"],
            "recipientName.snm"
        );

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(
            reloaded.profile("payroll").unwrap().description.as_deref(),
            Some("Monthly payroll export")
        );
    }

    #[test]
    fn test_payer_bn_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.payer_bn, None);

        config.payer_bn = Some("123456789RP0001".to_string());
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.payer_bn.as_deref(), Some("123456789RP0001"));
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.import_profiles.is_empty());
    }
}
