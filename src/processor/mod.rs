//! # Processor Module
//!
//! The `generate` batch: pairs Slang targets with Cg/HLSL sources, carries
//! license headers across and either prints the resulting diffs or applies
//! them in place.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - file reading, writing and backups
//! - [`file_collector`] - tree traversal and basename pairing
//! - [`splice`] - inserting a header below a target's directive prelude
//!
//! The [`HeaderPorter`] struct is the entry point, orchestrating the
//! submodules together with [`crate::header`] and [`crate::diff`].

mod file_collector;
mod file_io;
mod splice;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
pub use file_collector::{
  BasenameMap, CandidatePair, basename_key, build_basename_map, gather_files, normalize_extensions,
  pair_candidates, parse_extension_list,
};
pub use file_io::{BACKUP_SUFFIX, FileIO, backup_path};
pub use splice::{PRELUDE_WINDOW, prelude_len, splice_header};
use tracing::{debug, info, trace};

use crate::config::{
  DEFAULT_HEAD_LINES, DEFAULT_MAX_PAIRS, DEFAULT_SOURCE_EXTS, DEFAULT_SOURCE_ROOT, DEFAULT_TARGET_EXTS,
  DEFAULT_TARGET_ROOT,
};
use crate::diff::{DiffManager, unified_diff};
use crate::header::{HeaderPlan, plan_header, split_lines};
use crate::license_detection::{KeywordLicenseDetector, LicenseDetector};
use crate::report::{ItemReport, ItemStatus};
use crate::{git, output};

/// Where to look for files and how much of them to examine.
#[derive(Debug, Clone)]
pub struct ScanOptions {
  pub target_root: PathBuf,
  pub source_root: PathBuf,
  /// Normalized target extensions (`.slang`)
  pub target_exts: Vec<String>,
  /// Normalized source extensions (`.cg`)
  pub source_exts: Vec<String>,
  /// Leading lines read for license detection and header extraction
  pub head_lines: usize,
  /// Most pairs examined in one run, skipped pairs included
  pub max_pairs: usize,
  /// Leave out basenames that occur more than once in either tree
  pub unique_only: bool,
}

impl Default for ScanOptions {
  fn default() -> Self {
    Self {
      target_root: PathBuf::from(DEFAULT_TARGET_ROOT),
      source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
      target_exts: normalize_extensions(DEFAULT_TARGET_EXTS),
      source_exts: normalize_extensions(DEFAULT_SOURCE_EXTS),
      head_lines: DEFAULT_HEAD_LINES,
      max_pairs: DEFAULT_MAX_PAIRS,
      unique_only: false,
    }
  }
}

/// Configuration for creating a [`HeaderPorter`].
pub struct PorterConfig {
  pub scan: ScanOptions,

  /// Rewrite targets instead of only printing diffs
  pub apply: bool,

  /// Commit message for applied changes; `None` leaves them uncommitted
  pub commit_message: Option<String>,

  pub diff_manager: DiffManager,
  pub license_detector: Option<Box<dyn LicenseDetector>>,
}

/// What happened to one candidate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
  /// The target already mentions a license.
  TargetLicensed,
  /// The source has no comment block at its top.
  NoSourceHeader,
  /// The source comment holds no license text once compat lines are gone.
  NoLicenseKeywords,
  /// Splicing the header left the target unchanged.
  NoChange,
  /// The target is not valid UTF-8 and is left alone.
  TargetNotUtf8,
  /// The header would change the target; `diff` is the full unified diff.
  Diffed { diff: String },
  /// The target was rewritten; the original was moved to `backup`.
  Applied { diff: String, backup: PathBuf },
}

impl PairOutcome {
  /// Report status matching this outcome.
  pub const fn status(&self) -> ItemStatus {
    match self {
      Self::TargetLicensed => ItemStatus::TargetLicensed,
      Self::NoSourceHeader => ItemStatus::NoSourceHeader,
      Self::NoLicenseKeywords => ItemStatus::NoLicenseKeywords,
      Self::NoChange => ItemStatus::NoChange,
      Self::TargetNotUtf8 => ItemStatus::TargetNotUtf8,
      Self::Diffed { .. } => ItemStatus::Diffed,
      Self::Applied { .. } => ItemStatus::Applied,
    }
  }
}

/// Result of a [`HeaderPorter::run`].
#[derive(Debug, Default)]
pub struct PortSummary {
  /// One entry per examined pair, in processing order
  pub items: Vec<ItemReport>,
  /// Targets rewritten in apply mode
  pub modified: Vec<PathBuf>,
  /// Id of the commit holding `modified`, when one was made
  pub commit: Option<String>,
  pub elapsed: std::time::Duration,
}

/// Carries license headers from source files over to their ported targets.
pub struct HeaderPorter {
  scan: ScanOptions,
  apply: bool,
  commit_message: Option<String>,
  diff_manager: DiffManager,
  license_detector: Box<dyn LicenseDetector>,
}

impl HeaderPorter {
  /// Creates a porter and prepares the aggregate patch file, if any.
  pub fn new(config: PorterConfig) -> Result<Self> {
    config.diff_manager.init()?;

    Ok(Self {
      scan: config.scan,
      apply: config.apply,
      commit_message: config.commit_message,
      diff_manager: config.diff_manager,
      license_detector: config
        .license_detector
        .unwrap_or_else(|| Box::new(KeywordLicenseDetector::new())),
    })
  }

  /// Walks both trees and returns every candidate pair, in order.
  pub fn collect_pairs(&self) -> Result<Vec<CandidatePair>> {
    let targets = gather_files(&self.scan.target_root, &self.scan.target_exts)?;
    let sources = gather_files(&self.scan.source_root, &self.scan.source_exts)?;
    debug!("Collected {} targets and {} sources", targets.len(), sources.len());

    let target_map = build_basename_map(targets);
    let source_map = build_basename_map(sources);
    Ok(pair_candidates(&target_map, &source_map, self.scan.unique_only))
  }

  /// Works out what to do with one pair and, in apply mode, does it.
  ///
  /// Skip conditions are reported as outcomes; only I/O failures are
  /// errors.
  pub fn process_pair(&self, pair: &CandidatePair) -> Result<PairOutcome> {
    trace!(
      "Examining '{}': {} <= {}",
      pair.basename,
      pair.target.display(),
      pair.source.display()
    );

    let target_head = FileIO::read_head(&pair.target, self.scan.head_lines)?;
    if self.license_detector.has_license(&target_head) {
      return Ok(PairOutcome::TargetLicensed);
    }

    let source_head = FileIO::read_head(&pair.source, self.scan.head_lines)?;
    let header = match plan_header(&source_head) {
      HeaderPlan::NoSourceHeader => return Ok(PairOutcome::NoSourceHeader),
      HeaderPlan::NoLicenseKeywords => return Ok(PairOutcome::NoLicenseKeywords),
      HeaderPlan::Header(header) => header,
    };

    let Some(original) = FileIO::read_exact_content(&pair.target)? else {
      return Ok(PairOutcome::TargetNotUtf8);
    };
    let original_lines = split_lines(&original);
    let modified = splice_header(&original_lines, &header).concat();
    let label = pair.target.display().to_string();
    let diff = unified_diff(&label, &original, &modified);
    if diff.is_empty() {
      return Ok(PairOutcome::NoChange);
    }

    if !self.apply {
      return Ok(PairOutcome::Diffed { diff });
    }

    let backup = FileIO::backup_and_write(&pair.target, &modified)?;
    info!("Applied header to {}", pair.target.display());
    Ok(PairOutcome::Applied { diff, backup })
  }

  /// Runs the batch: examines up to `max_pairs` pairs and, in apply mode,
  /// commits the rewritten targets.
  ///
  /// A failed commit is reported and does not fail the run.
  pub fn run(&self) -> Result<PortSummary> {
    let start = Instant::now();
    let pairs = self.collect_pairs()?;
    output::print_candidate_count(pairs.len(), self.scan.max_pairs);

    let mut summary = PortSummary::default();
    for pair in pairs.iter().take(self.scan.max_pairs) {
      let outcome = self.process_pair(pair)?;
      self.report_outcome(pair, &outcome)?;

      let mut item = ItemReport::new(Some(pair.target.clone()), Some(pair.source.clone()), outcome.status());
      if let PairOutcome::Applied { backup, .. } = outcome {
        item = item.with_backup(backup);
        summary.modified.push(pair.target.clone());
      }
      summary.items.push(item);
    }

    if self.apply && !summary.modified.is_empty() {
      summary.commit = self.commit(&summary.modified);
    }

    if summary.items.is_empty() {
      output::print_nothing_to_show();
    }

    summary.elapsed = start.elapsed();
    Ok(summary)
  }

  fn report_outcome(&self, pair: &CandidatePair, outcome: &PairOutcome) -> Result<()> {
    match outcome {
      PairOutcome::TargetLicensed => output::print_target_licensed(&pair.target, &pair.source),
      PairOutcome::NoSourceHeader => output::print_no_source_header(&pair.source),
      PairOutcome::NoLicenseKeywords => output::print_no_license_keywords(&pair.source),
      PairOutcome::NoChange => output::print_no_change(&pair.target),
      PairOutcome::TargetNotUtf8 => output::print_target_not_utf8(&pair.target),
      PairOutcome::Diffed { diff } => self.diff_manager.emit_section(&pair.target, &pair.source, diff)?,
      PairOutcome::Applied { diff, backup } => {
        self.diff_manager.emit_section(&pair.target, &pair.source, diff)?;
        output::print_applied(&pair.target, backup);
      }
    }
    Ok(())
  }

  fn commit(&self, modified: &[PathBuf]) -> Option<String> {
    let message = self.commit_message.as_deref()?;

    match git::stage_and_commit(modified, message) {
      Ok(oid) => {
        output::print_committed(modified.len());
        Some(oid.to_string())
      }
      Err(e) => {
        output::print_commit_failed(&format!("{:#}", e));
        None
      }
    }
  }
}
