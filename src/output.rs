//! # Output Module
//!
//! Centralizes the user-facing status lines printed by `generate` and
//! `apply`.
//!
//! Progress and skip lines go to stdout and are silenced by `-q`. Failures
//! go to stderr and are always shown. Status prefixes are colored when the
//! terminal supports it (see [`crate::logging::ColorMode`]).

use std::fmt::Display;
use std::path::{Component, Path, PathBuf};

use owo_colors::{OwoColorize, Stream};

use crate::info_log;
use crate::logging::is_quiet;

/// Renders `path` for display, relative to the current directory when it
/// is absolute and lies below it.
pub fn display_path(path: &Path) -> String {
  match std::env::current_dir() {
    Ok(current_dir) => relative_to(path, &current_dir).display().to_string(),
    Err(_) => path.display().to_string(),
  }
}

/// Makes an absolute `path` relative to `base`; relative paths only lose
/// their `.` components.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
  if path.is_absolute() {
    if let Ok(stripped) = path.strip_prefix(base) {
      return stripped.to_path_buf();
    }
    if let Some(rel_path) = pathdiff::diff_paths(path, base)
      && !rel_path.starts_with("../..")
    {
      return rel_path;
    }
    return path.to_path_buf();
  }

  let normalized: PathBuf = path.components().filter(|c| !matches!(c, Component::CurDir)).collect();
  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}

fn status(line: &str) {
  if !is_quiet() {
    println!("{}", line);
  }
}

fn skip_prefix(label: &str) -> String {
  format!("-- {}", label).if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string()
}

/// `Found N candidate pairs (target, source). Showing up to M.`
pub fn print_candidate_count(found: usize, max_pairs: usize) {
  info_log!(
    "Found {} candidate pairs (target, source). Showing up to {}.",
    found, max_pairs
  );
}

pub fn print_target_licensed(target: &Path, source: &Path) {
  status(&format!(
    "{} {}   <=  {}",
    skip_prefix("SKIP (target has license):"),
    display_path(target),
    display_path(source)
  ));
}

pub fn print_no_source_header(source: &Path) {
  status(&format!(
    "{} {}  (no top comment block)",
    skip_prefix("NO SOURCE HEADER:"),
    display_path(source)
  ));
}

pub fn print_no_license_keywords(source: &Path) {
  status(&format!(
    "{} {}",
    skip_prefix("SKIP (source header lacks license keywords after stripping):"),
    display_path(source)
  ));
}

pub fn print_no_change(target: &Path) {
  status(&format!(
    "{} {}  (header conversion produced no diff)",
    skip_prefix("NO CHANGE NEEDED:"),
    display_path(target)
  ));
}

pub fn print_target_not_utf8(target: &Path) {
  status(&format!(
    "{} {}  (left unchanged)",
    skip_prefix("SKIP (target is not valid UTF-8):"),
    display_path(target)
  ));
}

pub fn print_applied(target: &Path, backup: &Path) {
  let prefix = "-- APPLIED:".if_supports_color(Stream::Stdout, |s| s.green()).to_string();
  status(&format!(
    "{} {}  (backup at {})",
    prefix,
    display_path(target),
    display_path(backup)
  ));
}

/// Printed when a run examined no pair at all.
pub fn print_nothing_to_show() {
  status("No candidate diffs found or nothing to show.");
}

pub fn print_committed(file_count: usize) {
  status(&format!(
    "{} {} files",
    "Committed".if_supports_color(Stream::Stdout, |s| s.green()),
    file_count
  ));
}

pub fn print_commit_failed(error: &dyn Display) {
  eprintln!(
    "{} {}",
    "git commit failed:".if_supports_color(Stream::Stderr, |s| s.red()),
    error
  );
}

/// `Found N diff sections to apply`
pub fn print_section_count(count: usize) {
  info_log!("Found {} diff sections to apply", count);
}

pub fn print_missing_file_paths() {
  eprintln!(
    "{}",
    "could not find file paths in section, skipping".if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_target_missing(target: &Path) {
  eprintln!(
    "{} {}",
    "target file does not exist, skipping:".if_supports_color(Stream::Stderr, |s| s.yellow()),
    display_path(target)
  );
}

pub fn print_restore_failed(target: &Path, reason: &str) {
  eprintln!(
    "{} {} error: {}",
    "failed to restore diff for".if_supports_color(Stream::Stderr, |s| s.red()),
    display_path(target),
    reason
  );
}

pub fn print_no_files_modified() {
  status("No files modified");
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_relative_to_strips_base() {
    let path = Path::new("/work/shaders/crt/a.slang");
    assert_eq!(relative_to(path, Path::new("/work/shaders")), PathBuf::from("crt/a.slang"));
  }

  #[test]
  fn test_relative_to_sibling_tree() {
    let path = Path::new("/work/common-shaders/crt/a.cg");
    assert_eq!(
      relative_to(path, Path::new("/work/slang-shaders")),
      PathBuf::from("../common-shaders/crt/a.cg")
    );
  }

  #[test]
  fn test_relative_to_distant_path_stays_absolute() {
    let path = Path::new("/opt/a.cg");
    assert_eq!(relative_to(path, Path::new("/home/user/work")), PathBuf::from("/opt/a.cg"));
  }

  #[test]
  fn test_relative_to_drops_cur_dir() {
    assert_eq!(
      relative_to(Path::new("./crt/a.slang"), Path::new("/any")),
      PathBuf::from("crt/a.slang")
    );
    assert_eq!(relative_to(Path::new("."), Path::new("/any")), PathBuf::from("."));
  }
}
