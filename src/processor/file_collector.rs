//! # File Collector Module
//!
//! Walks the target and source trees and pairs their files by basename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A target file and a source file that share a basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
  /// Lowercased file stem both files share
  pub basename: String,
  /// File in the target tree that may receive a header
  pub target: PathBuf,
  /// File in the source tree the header is taken from
  pub source: PathBuf,
}

/// Maps lowercased file stems to every path carrying that stem.
pub type BasenameMap = BTreeMap<String, Vec<PathBuf>>;

/// Normalizes a comma-separated extension list.
///
/// Entries are trimmed and lowercased, empty entries dropped and a leading
/// dot added where missing: `"CG, .hlsl,"` gives `[".cg", ".hlsl"]`.
pub fn parse_extension_list(list: &str) -> Vec<String> {
  normalize_extensions(list.split(','))
}

/// Normalizes extensions the same way as [`parse_extension_list`].
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  extensions
    .into_iter()
    .filter_map(|ext| {
      let ext = ext.as_ref().trim().to_lowercase();
      if ext.is_empty() {
        None
      } else if ext.starts_with('.') {
        Some(ext)
      } else {
        Some(format!(".{}", ext))
      }
    })
    .collect()
}

/// Returns the lowercased extension of a path with its leading dot.
fn dotted_extension(path: &Path) -> Option<String> {
  path
    .extension()
    .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Collects every file under `root` whose extension is in `extensions`.
///
/// Extensions are compared case-insensitively and must be normalized (see
/// [`normalize_extensions`]). Traversal is sorted by file name, so the result
/// is deterministic. Unreadable entries are logged and skipped.
pub fn gather_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
  if !root.is_dir() {
    bail!("Root directory does not exist: {}", root.display());
  }

  debug!("Scanning {} for {:?}", root.display(), extensions);

  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        warn!("Error walking {}: {}", root.display(), e);
        continue;
      }
    };

    if !entry.file_type().is_file() {
      continue;
    }

    let path = entry.into_path();
    if dotted_extension(&path).is_some_and(|ext| extensions.contains(&ext)) {
      files.push(path);
    }
  }

  debug!("Found {} files under {}", files.len(), root.display());
  Ok(files)
}

/// Returns the pairing key of a path: its file stem, lowercased.
pub fn basename_key(path: &Path) -> Option<String> {
  path.file_stem().map(|stem| stem.to_string_lossy().to_lowercase())
}

/// Groups paths by [`basename_key`], keeping their order within a group.
pub fn build_basename_map(paths: Vec<PathBuf>) -> BasenameMap {
  let mut map = BasenameMap::new();
  for path in paths {
    if let Some(key) = basename_key(&path) {
      map.entry(key).or_default().push(path);
    }
  }
  map
}

/// Pairs targets with sources that share a basename.
///
/// Basenames are visited in sorted order. A basename found several times in
/// either tree yields every target/source combination, which may pair files
/// that are not actually ports of each other; such basenames are logged and,
/// with `unique_only`, left out entirely.
pub fn pair_candidates(targets: &BasenameMap, sources: &BasenameMap, unique_only: bool) -> Vec<CandidatePair> {
  let mut pairs = Vec::new();

  for (basename, target_paths) in targets {
    let Some(source_paths) = sources.get(basename) else {
      continue;
    };

    if target_paths.len() > 1 || source_paths.len() > 1 {
      if unique_only {
        warn!(
          "Skipping ambiguous basename '{}' ({} targets, {} sources)",
          basename,
          target_paths.len(),
          source_paths.len()
        );
        continue;
      }
      warn!(
        "Basename '{}' is ambiguous ({} targets, {} sources); pairing every combination",
        basename,
        target_paths.len(),
        source_paths.len()
      );
    }

    for target in target_paths {
      for source in source_paths {
        pairs.push(CandidatePair {
          basename: basename.clone(),
          target: target.clone(),
          source: source.clone(),
        });
      }
    }
  }

  pairs
}
