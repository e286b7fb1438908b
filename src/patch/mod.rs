//! # Patch Module
//!
//! Replays an aggregate patch file written by `headerport generate`.
//!
//! The file is cut into sections on separator lines (three or more `=`),
//! sections that hold a `DIFF for target:` marker and a unified diff are
//! kept, and each diff is applied to its target with a backup left next to
//! it. A section that cannot be parsed or applied is logged and skipped;
//! the rest of the batch carries on.

mod hunk;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

pub use hunk::{Hunk, HunkLine, apply_hunks, parse_hunks};

use crate::diff::SECTION_MARKER;
use crate::processor::FileIO;

static FILE_PATHS_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^---\s+(\S+).*\n\+\+\+\s+(\S+)").expect("file paths regex must compile"));

/// Why a section could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
  /// No `---` line directly followed by a `+++` line.
  #[error("could not find file paths in section")]
  MissingFilePaths,

  /// A `@@` line that does not follow `@@ -a,b +c,d @@`.
  #[error("malformed hunk header: {header}")]
  MalformedHunkHeader { header: String },

  /// A hunk line with an unknown prefix or beyond the hunk's line counts.
  #[error("malformed hunk line: {line:?}")]
  MalformedHunkLine { line: String },

  /// The section ended before the hunk's line counts were met.
  #[error("hunk ends early: {header}")]
  TruncatedHunk { header: String },

  /// The hunk points outside the file or overlaps the previous hunk.
  #[error("hunk at line {line} is out of range for a file of {len} lines")]
  HunkOutOfRange { line: usize, len: usize },

  /// The file does not contain the lines the hunk expects.
  #[error("line {line} does not match: expected {expected:?}, found {actual:?}")]
  ContextMismatch {
    line: usize,
    expected: String,
    actual: String,
  },

  /// The section has no hunk at all.
  #[error("section contains no hunks")]
  NoHunks,
}

/// Splits an aggregate patch into sections.
///
/// Separators are lines made only of `=` (at least three). A section that
/// holds just the marker line is joined with the section after it, since
/// `generate` prints the marker between two separators.
pub fn split_sections(text: &str) -> Vec<String> {
  let mut raw: Vec<String> = Vec::new();
  let mut current: Vec<&str> = Vec::new();

  for line in text.split('\n') {
    if is_separator(line) {
      raw.push(current.join("\n"));
      current.clear();
    } else {
      current.push(line);
    }
  }
  raw.push(current.join("\n"));

  let mut sections = Vec::with_capacity(raw.len());
  let mut iter = raw.into_iter().peekable();
  while let Some(section) = iter.next() {
    let marker_only = section.contains(SECTION_MARKER) && !has_diff_header(&section);
    let next_is_body = iter
      .peek()
      .is_some_and(|next| !next.contains(SECTION_MARKER) && has_diff_header(next));

    if marker_only && next_is_body {
      if let Some(body) = iter.next() {
        sections.push(format!("{}\n{}", section, body));
      }
    } else {
      sections.push(section);
    }
  }

  sections
}

fn is_separator(line: &str) -> bool {
  let line = line.trim_end();
  line.len() >= 3 && line.chars().all(|c| c == '=')
}

fn has_diff_header(section: &str) -> bool {
  section.starts_with("--- ") || section.contains("\n--- ")
}

/// Returns `true` for sections that carry a marker and a unified diff.
pub fn is_applicable(section: &str) -> bool {
  section.contains(SECTION_MARKER) && has_diff_header(section)
}

/// Extracts the old and new file paths from the `---`/`+++` lines.
pub fn extract_file_paths(section: &str) -> Result<(String, String), PatchError> {
  let caps = FILE_PATHS_REGEX
    .captures(section)
    .ok_or(PatchError::MissingFilePaths)?;
  Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Returns the diff body of a section: every line from the first `@@ ` on.
pub fn diff_body(section: &str) -> Vec<&str> {
  section
    .split('\n')
    .skip_while(|line| !line.starts_with("@@ "))
    .collect()
}

/// Computes the patched content of `original` for one section.
pub fn restore_section(section: &str, original: &str) -> Result<String, PatchError> {
  let hunks = parse_hunks(&diff_body(section))?;
  if hunks.is_empty() {
    return Err(PatchError::NoHunks);
  }
  apply_hunks(original, &hunks)
}

/// What happened to one applicable section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
  /// The `---`/`+++` lines were missing.
  MissingFilePaths,
  /// The target named by the section does not exist.
  TargetMissing { target: PathBuf },
  /// The target is not valid UTF-8 and is left alone.
  TargetNotUtf8 { target: PathBuf },
  /// The diff could not be reconstructed against the target.
  RestoreFailed { target: PathBuf, reason: String },
  /// The target was rewritten.
  Applied { target: PathBuf, backup: PathBuf },
}

/// Applies the sections of an aggregate patch to files under `root`.
pub struct PatchApplier {
  /// Directory that relative paths in the patch are resolved against
  root: PathBuf,
}

impl PatchApplier {
  pub const fn new(root: PathBuf) -> Self {
    Self { root }
  }

  /// Applies one section. Only I/O failures are returned as errors.
  pub fn apply_section(&self, section: &str) -> Result<SectionOutcome> {
    let (target, _) = match extract_file_paths(section) {
      Ok(paths) => paths,
      Err(e) => {
        debug!("Section without file paths: {}", e);
        return Ok(SectionOutcome::MissingFilePaths);
      }
    };

    let target_path = self.root.join(&target);
    if !target_path.exists() {
      return Ok(SectionOutcome::TargetMissing { target: target_path });
    }

    let Some(original) = FileIO::read_exact_content(&target_path)? else {
      return Ok(SectionOutcome::TargetNotUtf8 { target: target_path });
    };
    let patched = match restore_section(section, &original) {
      Ok(patched) => patched,
      Err(e) => {
        warn!("Failed to restore diff for {}: {}", target_path.display(), e);
        return Ok(SectionOutcome::RestoreFailed {
          target: target_path,
          reason: e.to_string(),
        });
      }
    };

    let backup = FileIO::backup_and_write(&target_path, &patched)?;
    Ok(SectionOutcome::Applied {
      target: target_path,
      backup,
    })
  }
}

/// Reads an aggregate patch file.
pub fn read_patch_file(path: &Path) -> Result<String> {
  if !path.is_file() {
    anyhow::bail!("patch file not found: {}", path.display());
  }
  FileIO::read_full_content(path).with_context(|| format!("Failed to read patch file {}", path.display()))
}
