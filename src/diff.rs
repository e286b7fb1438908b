//! # Diff Module
//!
//! Creates unified diffs between a target file and its spliced version and
//! renders them as sections of the aggregate patch format:
//!
//! ```text
//! ================================================================================
//! DIFF for target: slang/crt/crt-geom.slang   <=  source: cg/crt/crt-geom.cg
//! ================================================================================
//! --- slang/crt/crt-geom.slang
//! +++ slang/crt/crt-geom.slang
//! @@ -1,3 +1,8 @@
//! ```
//!
//! The same format is read back by [`crate::patch`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use similar::TextDiff;

use crate::logging::is_quiet;

/// Marker that opens every diff section.
pub const SECTION_MARKER: &str = "DIFF for target:";

/// Width of the `=` separator lines around a section marker.
pub const SEPARATOR_WIDTH: usize = 80;

/// Lines of context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Builds a unified diff between two texts, labelling both sides `label`.
///
/// Returns an empty string when the texts are equal.
pub fn unified_diff(label: &str, original: &str, modified: &str) -> String {
  if original == modified {
    return String::new();
  }

  TextDiff::from_lines(original, modified)
    .unified_diff()
    .context_radius(CONTEXT_RADIUS)
    .header(label, label)
    .to_string()
}

/// Renders the marker block that introduces one section.
pub fn section_header(target: &Path, source: &Path) -> String {
  let separator = "=".repeat(SEPARATOR_WIDTH);
  format!(
    "{separator}\n{} {}   <=  source: {}\n{separator}\n",
    SECTION_MARKER,
    target.display(),
    source.display()
  )
}

/// Shortens a diff for the console, keeping its first and last halves.
///
/// Diffs of at most `max_lines` lines are returned unchanged.
pub fn truncate_diff(diff: &str, max_lines: usize) -> String {
  let lines: Vec<&str> = diff.lines().collect();
  if lines.len() <= max_lines {
    return diff.to_string();
  }

  let half = max_lines / 2;
  let mut out = String::new();
  for line in &lines[..half] {
    out.push_str(line);
    out.push('\n');
  }
  out.push_str("... (diff truncated) ...\n");
  for line in &lines[lines.len() - half..] {
    out.push_str(line);
    out.push('\n');
  }
  out
}

/// Prints diff sections to stdout and optionally appends them to a patch
/// file.
///
/// Console output is truncated to `max_display_lines`; the saved patch
/// always holds complete diffs so it can be replayed by `headerport apply`.
pub struct DiffManager {
  /// Whether diff bodies are printed (dry run)
  pub show_diff: bool,

  /// Longest diff printed in full
  pub max_display_lines: usize,

  /// Aggregate patch file sections are appended to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  /// Creates a new DiffManager.
  ///
  /// # Parameters
  ///
  /// * `show_diff` - Whether diff bodies are printed
  /// * `max_display_lines` - Longest diff printed without truncation
  /// * `save_diff_path` - Patch file to append sections to
  pub const fn new(show_diff: bool, max_display_lines: usize, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      max_display_lines,
      save_diff_path,
    }
  }

  /// Truncates the patch file so a run starts from an empty batch.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
      {
        std::fs::create_dir_all(parent)
          .with_context(|| format!("Failed to create directory for diff file: {}", parent.display()))?;
      }
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  /// Prints one section and appends it to the patch file, if any.
  ///
  /// The marker block is printed unless quiet mode is on; the diff body
  /// only when `show_diff` is set as well. The patch file always receives
  /// the full section.
  pub fn emit_section(&self, target: &Path, source: &Path, diff: &str) -> Result<()> {
    let header = section_header(target, source);

    if !is_quiet() {
      println!();
      print!("{}", header);
      if self.show_diff {
        print!("{}", truncate_diff(diff, self.max_display_lines));
      }
    }

    if let Some(ref path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open diff file: {}", path.display()))?;
      write!(file, "\n{}{}", header, diff).with_context(|| format!("Failed to write diff file: {}", path.display()))?;
    }

    Ok(())
  }
}
