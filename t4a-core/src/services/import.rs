//! Import service - CSV slip import
//!
//! An `ImportSession` carries one file through the two-step import: the
//! column mapping is reviewed and edited first, then the built slips are
//! previewed and committed. Every mapping edit rebuilds the slips from the
//! raw rows. Nothing reaches the caller's collection until a commit passes
//! validation for every row.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result as AnyResult};
use serde::Serialize;

use super::mapping::{resolve, ColumnMapping};
use super::normalize::build;
use super::validation::validate_batch;
use crate::adapters::CsvFileSource;
use crate::config::{Config, ImportProfile};
use crate::domain::result::{Error, Result};
use crate::domain::{SlipDraft, SlipField};
use crate::ports::{CsvRows, CsvSource};

/// Step the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPhase {
    /// Reviewing and editing the column mapping
    Configure,
    /// Previewing built slips before commit
    Confirm,
    /// Slips handed over; the session is spent
    Committed,
}

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Number of slips appended
    Committed(usize),
    /// Per-row error messages; nothing was appended
    Rejected(BTreeMap<usize, Vec<String>>),
}

/// One in-progress CSV import
#[derive(Debug)]
pub struct ImportSession {
    rows: CsvRows,
    mapping: ColumnMapping,
    slips: Vec<SlipDraft>,
    payer_bn: String,
    phase: ImportPhase,
}

impl ImportSession {
    /// Read a file through `source` and resolve its columns
    pub fn open(source: &dyn CsvSource, path: &Path, payer_bn: impl Into<String>) -> Result<Self> {
        let rows = source.read_rows(path)?;
        Self::from_rows(rows, payer_bn)
    }

    /// Start a session from rows already in memory, header row first
    pub fn from_rows(rows: CsvRows, payer_bn: impl Into<String>) -> Result<Self> {
        let Some(headers) = rows.first() else {
            return Err(Error::malformed("file contains no rows"));
        };
        let mapping = resolve(headers);

        let mut session = Self {
            rows,
            mapping,
            slips: Vec::new(),
            payer_bn: payer_bn.into(),
            phase: ImportPhase::Configure,
        };
        session.rebuild();
        Ok(session)
    }

    fn rebuild(&mut self) {
        let active = self.mapping.active_fields();
        let data_rows = self.rows.get(1..).unwrap_or_default();
        self.slips = build(data_rows, &self.mapping, &active);
        for slip in &mut self.slips {
            slip.bn = self.payer_bn.clone();
        }
    }

    fn require_phase(&self, phase: ImportPhase, action: &str) -> Result<()> {
        if self.phase != phase {
            return Err(Error::invalid_state(format!(
                "cannot {} while in {:?} phase",
                action, self.phase
            )));
        }
        Ok(())
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Header row as read from the file
    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Fields receiving data, in column order
    pub fn active_fields(&self) -> Vec<SlipField> {
        self.mapping.active_fields()
    }

    pub fn slips(&self) -> &[SlipDraft] {
        &self.slips
    }

    /// Change one column's target and rebuild the slips
    ///
    /// Any edits made to individual slips are lost.
    pub fn set_mapping(&mut self, header: &str, field: Option<SlipField>) -> Result<()> {
        self.require_phase(ImportPhase::Configure, "edit the mapping")?;
        self.mapping.set(header, field)?;
        self.rebuild();
        Ok(())
    }

    /// Apply header to field-path overrides as one edit
    ///
    /// An empty path unmaps the column. If any header or path is unknown the
    /// mapping is left as it was.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) -> Result<()> {
        self.require_phase(ImportPhase::Configure, "edit the mapping")?;

        let mut mapping = self.mapping.clone();
        for (header, path) in overrides {
            let field = if path.trim().is_empty() {
                None
            } else {
                Some(path.parse::<SlipField>()?)
            };
            mapping.set(header, field)?;
        }

        self.mapping = mapping;
        self.rebuild();
        Ok(())
    }

    /// Apply a saved profile's overrides
    pub fn apply_profile(&mut self, profile: &ImportProfile) -> Result<()> {
        self.apply_overrides(&profile.column_mappings)
    }

    /// Current mapping in profile form, mapped columns only
    pub fn to_profile(&self, description: Option<String>) -> ImportProfile {
        let column_mappings = self
            .mapping
            .mapped()
            .filter_map(|c| c.field.map(|f| (c.header.clone(), f.path().to_string())))
            .collect();
        ImportProfile {
            column_mappings,
            description,
        }
    }

    /// Mutable access to one built slip for preview corrections
    pub fn edit_slip(&mut self, index: usize) -> Option<&mut SlipDraft> {
        if self.phase == ImportPhase::Committed {
            return None;
        }
        self.slips.get_mut(index)
    }

    /// Move from mapping to preview
    pub fn proceed(&mut self) -> Result<()> {
        self.require_phase(ImportPhase::Configure, "advance")?;
        self.phase = ImportPhase::Confirm;
        Ok(())
    }

    /// Return from preview to mapping
    pub fn back(&mut self) -> Result<()> {
        self.require_phase(ImportPhase::Confirm, "go back")?;
        self.phase = ImportPhase::Configure;
        Ok(())
    }

    /// Validate every row without committing
    pub fn validate(&self) -> BTreeMap<usize, Vec<String>> {
        validate_batch(&self.slips)
    }

    /// Append the batch to `target` if every row validates
    ///
    /// On rejection the session stays in preview with its slips intact so
    /// they can be corrected and committed again.
    pub fn commit(&mut self, target: &mut Vec<SlipDraft>) -> Result<ImportOutcome> {
        self.require_phase(ImportPhase::Confirm, "commit")?;

        let errors = self.validate();
        if !errors.is_empty() {
            return Ok(ImportOutcome::Rejected(errors));
        }

        let count = self.slips.len();
        target.append(&mut self.slips);
        self.phase = ImportPhase::Committed;
        Ok(ImportOutcome::Committed(count))
    }

    /// Discard the session
    pub fn cancel(self) {}
}

/// Entry point for file imports and saved profiles
pub struct ImportService {
    app_dir: PathBuf,
}

impl ImportService {
    pub fn new(app_dir: PathBuf) -> Self {
        Self { app_dir }
    }

    /// Open a CSV file from disk
    pub fn open(&self, file_path: &Path, payer_bn: &str) -> AnyResult<ImportSession> {
        ImportSession::open(&CsvFileSource::new(), file_path, payer_bn)
            .with_context(|| format!("Failed to import {}", file_path.display()))
    }

    /// List saved import profiles
    pub fn list_profiles(&self) -> AnyResult<BTreeMap<String, ImportProfile>> {
        let config = Config::load(&self.app_dir)?;
        Ok(config.import_profiles)
    }

    pub fn get_profile(&self, name: &str) -> AnyResult<Option<ImportProfile>> {
        let config = Config::load(&self.app_dir)?;
        Ok(config.profile(name).cloned())
    }

    /// Save the session's current mapping under `name`
    pub fn save_profile(
        &self,
        name: &str,
        session: &ImportSession,
        description: Option<String>,
    ) -> AnyResult<()> {
        let mut config = Config::load(&self.app_dir)?;
        config.set_profile(name, session.to_profile(description));
        config.save(&self.app_dir)?;
        Ok(())
    }
}
