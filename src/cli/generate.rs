//! # Generate Command
//!
//! Pairs ported Slang targets with their Cg/HLSL sources by basename and
//! carries the source license header over. Dry run by default; `--apply`
//! rewrites the targets, keeps `.bak` backups and commits the result.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use tracing::debug;

use crate::config::{
  Config, DEFAULT_HEAD_LINES, DEFAULT_MAX_DIFF_LINES, DEFAULT_MAX_PAIRS, DEFAULT_SOURCE_ROOT, DEFAULT_TARGET_ROOT,
};
use crate::diff::DiffManager;
use crate::git::DEFAULT_COMMIT_MESSAGE;
use crate::processor::{HeaderPorter, PorterConfig, ScanOptions, normalize_extensions, parse_extension_list};
use crate::report::{RunReport, RunSummary};

/// Arguments for the generate command
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
  /// Root of the ported tree that receives headers [default: .]
  #[arg(long, value_name = "DIR")]
  pub target_root: Option<PathBuf>,

  /// Root of the original tree headers are taken from [default: ../common-shaders]
  #[arg(long, value_name = "DIR")]
  pub source_root: Option<PathBuf>,

  /// Comma-separated target extensions [default: .slang,.slangp]
  #[arg(long, value_name = "LIST")]
  pub target_exts: Option<String>,

  /// Comma-separated source extensions [default: .cg,.cgp,.hlsl]
  #[arg(long, value_name = "LIST")]
  pub source_exts: Option<String>,

  /// Most pairs to examine, skipped pairs included [default: 30]
  #[arg(
    long,
    value_name = "N",
    value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
  )]
  pub max_pairs: Option<usize>,

  /// Leading lines read from each file [default: 80]
  #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
  pub head_lines: Option<u64>,

  /// Longest diff printed without truncation [default: 200]
  #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
  pub max_diff_lines: Option<u64>,

  /// Rewrite targets in place (original kept as <file>.bak) and commit
  #[arg(long)]
  pub apply: bool,

  /// Append every diff section to this aggregate patch file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Skip basenames that occur more than once in either tree
  #[arg(long)]
  pub unique_only: bool,

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

impl GenerateArgs {
  /// Resolves the scan settings: flags first, then the config file, then
  /// the built-in defaults.
  pub fn scan_options(&self, config: &Config) -> Result<ScanOptions> {
    let scan = &config.scan;

    let target_exts = resolve_extensions(self.target_exts.as_deref(), scan.target_exts.as_deref())
      .unwrap_or_else(|| ScanOptions::default().target_exts);
    let source_exts = resolve_extensions(self.source_exts.as_deref(), scan.source_exts.as_deref())
      .unwrap_or_else(|| ScanOptions::default().source_exts);
    if target_exts.is_empty() {
      bail!("--target-exts must list at least one extension");
    }
    if source_exts.is_empty() {
      bail!("--source-exts must list at least one extension");
    }

    Ok(ScanOptions {
      target_root: self
        .target_root
        .clone()
        .or_else(|| scan.target_root.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_ROOT)),
      source_root: self
        .source_root
        .clone()
        .or_else(|| scan.source_root.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_ROOT)),
      target_exts,
      source_exts,
      head_lines: self
        .head_lines
        .map(|n| n as usize)
        .or(scan.head_lines)
        .unwrap_or(DEFAULT_HEAD_LINES),
      max_pairs: self.max_pairs.or(scan.max_pairs).unwrap_or(DEFAULT_MAX_PAIRS),
      unique_only: self.unique_only,
    })
  }

  /// Longest diff printed without truncation.
  pub fn max_diff_lines(&self, config: &Config) -> usize {
    self
      .max_diff_lines
      .map(|n| n as usize)
      .or(config.diff.max_lines)
      .unwrap_or(DEFAULT_MAX_DIFF_LINES)
  }

  /// Commit message for applied changes, or `None` when nothing should be
  /// committed.
  pub fn commit_message(&self, config: &Config) -> Option<String> {
    if !self.apply || self.no_commit || config.commit.enabled == Some(false) {
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

/// Parses the flag value when given, else normalizes the config list.
fn resolve_extensions(flag: Option<&str>, configured: Option<&[String]>) -> Option<Vec<String>> {
  match (flag, configured) {
    (Some(list), _) => Some(parse_extension_list(list)),
    (None, Some(list)) => Some(normalize_extensions(list)),
    (None, None) => None,
  }
}

/// Run the generate command with the given arguments
pub fn run_generate(args: GenerateArgs, config: &Config) -> Result<()> {
  let scan = args.scan_options(config)?;
  debug!("Scan options: {:?}", scan);

  let porter = HeaderPorter::new(PorterConfig {
    scan,
    apply: args.apply,
    commit_message: args.commit_message(config),
    diff_manager: DiffManager::new(!args.apply, args.max_diff_lines(config), args.save_diff.clone()),
    license_detector: None,
  })?;

  let result = porter.run()?;

  if let Some(ref path) = args.report_json {
    let mode = if args.apply { "generate --apply" } else { "generate" };
    let mut summary = RunSummary::from_items(mode, &result.items, result.elapsed);
    summary.commit = result.commit;
    RunReport {
      summary,
      items: result.items,
    }
    .write_json(path)?;
    debug!("Wrote report to {}", path.display());
  }

  Ok(())
}
