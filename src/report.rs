//! # Report Module
//!
//! JSON reports of a `generate` or `apply` run.
//!
//! Every examined pair (or patch section) becomes one [`ItemReport`]; the
//! [`RunSummary`] counts them by outcome and records when the run finished.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

/// What happened to one examined pair or patch section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
  /// Target already carried license text
  TargetLicensed,
  /// Source has no leading comment block
  NoSourceHeader,
  /// Source header holds no license keywords once compat lines are gone
  NoLicenseKeywords,
  /// Splicing the header changed nothing
  NoChange,
  /// Target is not valid UTF-8 and was left alone
  TargetNotUtf8,
  /// A diff was produced (dry run)
  Diffed,
  /// The target was rewritten
  Applied,
  /// Patch section without `---`/`+++` lines
  MissingFilePaths,
  /// Patch section names a target that does not exist
  TargetMissing,
  /// Patch section could not be applied to the current target
  RestoreFailed,
}

impl ItemStatus {
  /// Whether this status counts as a skip rather than a change.
  pub const fn is_skip(self) -> bool {
    matches!(
      self,
      Self::TargetLicensed | Self::NoSourceHeader | Self::NoLicenseKeywords | Self::NoChange | Self::TargetNotUtf8
    )
  }

  /// Whether this status counts as a failure.
  pub const fn is_failure(self) -> bool {
    matches!(self, Self::MissingFilePaths | Self::TargetMissing | Self::RestoreFailed)
  }
}

/// Report entry for one examined pair or patch section.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
  /// Target file, when known
  #[serde(with = "path_serialization::optional")]
  pub target: Option<PathBuf>,
  /// Source file the header came from, when known
  #[serde(with = "path_serialization::optional")]
  pub source: Option<PathBuf>,
  /// Outcome
  pub status: ItemStatus,
  /// Backup written before the target was replaced
  #[serde(with = "path_serialization::optional", skip_serializing_if = "Option::is_none")]
  pub backup: Option<PathBuf>,
  /// Free-form detail, such as a patch error
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl ItemReport {
  /// Creates an entry with no backup or detail.
  pub const fn new(target: Option<PathBuf>, source: Option<PathBuf>, status: ItemStatus) -> Self {
    Self {
      target,
      source,
      status,
      backup: None,
      detail: None,
    }
  }

  /// Sets the backup path.
  pub fn with_backup(mut self, backup: PathBuf) -> Self {
    self.backup = Some(backup);
    self
  }

  /// Sets the detail message.
  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }
}

/// Helper module for serializing paths as plain strings
mod path_serialization {
  pub mod optional {
    use std::path::PathBuf;

    use serde::Serializer;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error>
    where
      S: Serializer,
    {
      match path {
        Some(path) => serializer.serialize_str(&path.to_string_lossy()),
        None => serializer.serialize_none(),
      }
    }
  }
}

/// Summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  /// `generate`, `generate --apply` or `apply`
  pub mode: String,
  /// Number of examined pairs or sections
  pub total_items: usize,
  /// Number of diffs produced without writing
  pub diffed: usize,
  /// Number of rewritten targets
  pub applied: usize,
  /// Number of skipped pairs
  pub skipped: usize,
  /// Number of sections that could not be applied
  pub failed: usize,
  /// Id of the commit holding the applied changes
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit: Option<String>,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: std::time::Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// When the report was generated (RFC 3339)
  pub timestamp: String,
}

impl RunSummary {
  /// Builds a summary by counting `items` by status.
  pub fn from_items(mode: &str, items: &[ItemReport], processing_time: std::time::Duration) -> Self {
    let mut summary = Self {
      mode: mode.to_string(),
      total_items: items.len(),
      diffed: 0,
      applied: 0,
      skipped: 0,
      failed: 0,
      commit: None,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().to_rfc3339(),
    };

    for item in items {
      match item.status {
        ItemStatus::Diffed => summary.diffed += 1,
        ItemStatus::Applied => summary.applied += 1,
        status if status.is_failure() => summary.failed += 1,
        _ => summary.skipped += 1,
      }
    }

    summary
  }
}

/// A complete run report, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub summary: RunSummary,
  pub items: Vec<ItemReport>,
}

impl RunReport {
  /// Pretty-printed JSON for this report.
  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string_pretty(self).context("Failed to serialize report")
  }

  /// Writes the report as JSON to `path`.
  pub fn write_json(&self, path: &Path) -> Result<()> {
    let content = self.to_json()?;
    fs::write(path, content).with_context(|| format!("Failed to write report to {}", path.display()))
  }
}
