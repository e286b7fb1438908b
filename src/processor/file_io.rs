//! # File I/O Module
//!
//! Reading and writing helpers for the batch tools. Heads read for
//! classification are decoded as UTF-8 with invalid sequences replaced,
//! since shader sources in the wild are not always clean UTF-8. Content
//! that gets rewritten is read strictly so no byte is ever altered.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};


/// Suffix appended to a file name to form its backup.
pub const BACKUP_SUFFIX: &str = ".bak";

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Reads at most `max_lines` lines from the start of a file.
  ///
  /// Line terminators are kept.
  pub fn read_head(path: &Path, max_lines: usize) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while lines.len() < max_lines {
      buf.clear();
      let read = reader
        .read_until(b'\n', &mut buf)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
      if read == 0 {
        break;
      }
      lines.push(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(lines)
  }

  /// Reads a whole file as a string.
  pub fn read_full_content(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  /// Reads a whole file that is about to be rewritten.
  ///
  /// Returns `None` when the file is not valid UTF-8.
  pub fn read_exact_content(path: &Path) -> Result<Option<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    match String::from_utf8(bytes) {
      Ok(content) => Ok(Some(content)),
      Err(e) => {
        debug!("{} is not valid UTF-8: {}", path.display(), e.utf8_error());
        Ok(None)
      }
    }
  }

  /// Writes file content.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }

  /// Moves `path` aside to its backup and writes `content` in its place.
  ///
  /// The original is renamed; if the rename fails it is copied instead.
  /// Returns the backup path.
  pub fn backup_and_write(path: &Path, content: &str) -> Result<PathBuf> {
    let backup = backup_path(path);

    if let Err(e) = std::fs::rename(path, &backup) {
      warn!("Rename to {} failed ({}), copying instead", backup.display(), e);
      std::fs::copy(path, &backup)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), backup.display()))?;
    }
    debug!("Backed up {} to {}", path.display(), backup.display());

    Self::write_file(path, content)?;
    Ok(backup)
  }
}

/// Returns the backup path for a file: its full name plus [`BACKUP_SUFFIX`].
pub fn backup_path(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(BACKUP_SUFFIX);
  PathBuf::from(name)
}
