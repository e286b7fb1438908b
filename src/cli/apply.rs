//! # Apply Command
//!
//! Replays an aggregate patch written by `generate --save-diff` (or a
//! captured dry run) against the target tree, then commits every rewritten
//! file in one commit.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::config::{Config, DEFAULT_PATCH_FILE};
use crate::git::{self, DEFAULT_COMMIT_MESSAGE};
use crate::output;
use crate::patch::{PatchApplier, SectionOutcome, is_applicable, read_patch_file, split_sections};
use crate::report::{ItemReport, ItemStatus, RunReport, RunSummary};

/// Arguments for the apply command
#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
  /// Aggregate patch to apply [default: <root>/tools/license_diffs_all.patch]
  #[arg(value_name = "PATCH")]
  pub patch: Option<PathBuf>,

  /// Directory that target paths in the patch are relative to
  #[arg(long, value_name = "DIR", default_value = ".")]
  pub root: PathBuf,

  /// Leave applied changes uncommitted
  #[arg(long)]
  pub no_commit: bool,

  /// Commit message for applied changes
  #[arg(long, value_name = "MSG")]
  pub commit_message: Option<String>,

  /// Write a JSON report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,
}

impl ApplyArgs {
  /// Patch file to read.
  pub fn patch_path(&self) -> PathBuf {
    self.patch.clone().unwrap_or_else(|| self.root.join(DEFAULT_PATCH_FILE))
  }

  /// Commit message for applied changes, or `None` when nothing should be
  /// committed.
  pub fn commit_message(&self, config: &Config) -> Option<String> {
    if self.no_commit || config.commit.enabled == Some(false) {
      return None;
    }

    Some(
      self
        .commit_message
        .clone()
        .or_else(|| config.commit.message.clone())
        .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
    )
  }
}

/// Converts a section outcome into a report entry, printing its status.
fn record_outcome(outcome: SectionOutcome, modified: &mut Vec<PathBuf>) -> ItemReport {
  match outcome {
    SectionOutcome::MissingFilePaths => {
      output::print_missing_file_paths();
      ItemReport::new(None, None, ItemStatus::MissingFilePaths).with_detail("could not find file paths in section")
    }
    SectionOutcome::TargetMissing { target } => {
      output::print_target_missing(&target);
      ItemReport::new(Some(target), None, ItemStatus::TargetMissing)
    }
    SectionOutcome::TargetNotUtf8 { target } => {
      output::print_target_not_utf8(&target);
      ItemReport::new(Some(target), None, ItemStatus::TargetNotUtf8)
    }
    SectionOutcome::RestoreFailed { target, reason } => {
      output::print_restore_failed(&target, &reason);
      ItemReport::new(Some(target), None, ItemStatus::RestoreFailed).with_detail(reason)
    }
    SectionOutcome::Applied { target, backup } => {
      output::print_applied(&target, &backup);
      modified.push(target.clone());
      ItemReport::new(Some(target), None, ItemStatus::Applied).with_backup(backup)
    }
  }
}

/// Run the apply command with the given arguments
///
/// Sections that cannot be applied are reported and skipped. A failed
/// commit is an error.
pub fn run_apply(args: ApplyArgs, config: &Config) -> Result<()> {
  let start = Instant::now();
  let patch_path = args.patch_path();
  let text = read_patch_file(&patch_path)?;

  let sections: Vec<String> = split_sections(&text).into_iter().filter(|s| is_applicable(s)).collect();
  output::print_section_count(sections.len());

  let applier = PatchApplier::new(args.root.clone());
  let mut items = Vec::with_capacity(sections.len());
  let mut modified = Vec::new();
  for section in &sections {
    let outcome = applier.apply_section(section)?;
    items.push(record_outcome(outcome, &mut modified));
  }

  let mut commit = None;
  if modified.is_empty() {
    output::print_no_files_modified();
  } else if let Some(message) = args.commit_message(config) {
    let oid = git::stage_and_commit(&modified, &message).context("git commit failed")?;
    output::print_committed(modified.len());
    commit = Some(oid.to_string());
  } else {
    debug!("Leaving {} modified files uncommitted", modified.len());
  }

  if let Some(ref path) = args.report_json {
    let mut summary = RunSummary::from_items("apply", &items, start.elapsed());
    summary.commit = commit;
    RunReport { summary, items }.write_json(path)?;
    debug!("Wrote report to {}", path.display());
  }

  Ok(())
}
