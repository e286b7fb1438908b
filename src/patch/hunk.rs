//! Parsing and applying unified-diff hunks.

use std::sync::LazyLock;

use regex::Regex;

use super::PatchError;
use crate::header::split_lines;

static HUNK_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("hunk header regex must compile")
});

/// One line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkLine {
  /// Line present on both sides
  Context(String),
  /// Line only in the new file; `newline` is false before a
  /// `\ No newline at end of file` marker
  Insert { text: String, newline: bool },
  /// Line only in the old file
  Delete(String),
}

/// A parsed `@@ -a,b +c,d @@` hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
  pub old_start: usize,
  pub old_len: usize,
  pub new_start: usize,
  pub new_len: usize,
  pub lines: Vec<HunkLine>,
}

/// Parses every hunk in a diff body.
///
/// `lines` starts at the first `@@ ` line and carries no line terminators.
/// A hunk ends once its line counts are satisfied; whatever follows up to
/// the next `@@ ` line is ignored, so trailing status lines or blank lines
/// in an aggregate patch do no harm. A blank line inside a hunk is read as an
/// empty context line.
pub fn parse_hunks(lines: &[&str]) -> Result<Vec<Hunk>, PatchError> {
  let mut hunks = Vec::new();
  let mut i = 0;

  while i < lines.len() {
    let line = lines[i];
    if !line.starts_with("@@ ") {
      i += 1;
      continue;
    }

    let mut hunk = parse_hunk_header(line)?;
    i += 1;

    let mut old_seen = 0;
    let mut new_seen = 0;
    while old_seen < hunk.old_len || new_seen < hunk.new_len {
      let Some(&body) = lines.get(i) else {
        return Err(PatchError::TruncatedHunk {
          header: line.to_string(),
        });
      };
      i += 1;

      if let Some(text) = body.strip_prefix('+') {
        hunk.lines.push(HunkLine::Insert {
          text: text.to_string(),
          newline: true,
        });
        new_seen += 1;
      } else if let Some(text) = body.strip_prefix('-') {
        hunk.lines.push(HunkLine::Delete(text.to_string()));
        old_seen += 1;
      } else if let Some(text) = body.strip_prefix(' ') {
        hunk.lines.push(HunkLine::Context(text.to_string()));
        old_seen += 1;
        new_seen += 1;
      } else if body.is_empty() {
        hunk.lines.push(HunkLine::Context(String::new()));
        old_seen += 1;
        new_seen += 1;
      } else if body.starts_with('\\') {
        mark_no_newline(&mut hunk);
      } else {
        return Err(PatchError::MalformedHunkLine {
          line: body.to_string(),
        });
      }

      if old_seen > hunk.old_len || new_seen > hunk.new_len {
        return Err(PatchError::MalformedHunkLine {
          line: body.to_string(),
        });
      }
    }

    if lines.get(i).is_some_and(|next| next.starts_with('\\')) {
      mark_no_newline(&mut hunk);
      i += 1;
    }

    hunks.push(hunk);
  }

  Ok(hunks)
}

fn parse_hunk_header(line: &str) -> Result<Hunk, PatchError> {
  let malformed = || PatchError::MalformedHunkHeader {
    header: line.to_string(),
  };

  let caps = HUNK_HEADER_REGEX.captures(line).ok_or_else(malformed)?;
  let number = |index: usize| -> Result<usize, PatchError> {
    match caps.get(index) {
      Some(m) => m.as_str().parse().ok().ok_or_else(malformed),
      None => Ok(1),
    }
  };

  Ok(Hunk {
    old_start: number(1)?,
    old_len: number(2)?,
    new_start: number(3)?,
    new_len: number(4)?,
    lines: Vec::new(),
  })
}

/// Applies a `\ No newline at end of file` marker to the preceding line.
///
/// Only inserted lines need it; context and deleted lines are copied or
/// checked against the original without their terminators.
fn mark_no_newline(hunk: &mut Hunk) {
  if let Some(HunkLine::Insert { newline, .. }) = hunk.lines.last_mut() {
    *newline = false;
  }
}

/// Applies hunks, in order, to `original` and returns the new text.
///
/// Context and deleted lines must match the original exactly (ignoring the
/// `\n` terminator); context lines are copied from the original so their
/// terminators survive untouched.
pub fn apply_hunks(original: &str, hunks: &[Hunk]) -> Result<String, PatchError> {
  let old_lines = split_lines(original);
  let mut new_lines: Vec<String> = Vec::with_capacity(old_lines.len());
  let mut cursor = 0;

  for hunk in hunks {
    let start = if hunk.old_len == 0 {
      hunk.old_start
    } else {
      hunk.old_start.checked_sub(1).ok_or(PatchError::HunkOutOfRange {
        line: hunk.old_start,
        len: old_lines.len(),
      })?
    };
    if start < cursor || start > old_lines.len() {
      return Err(PatchError::HunkOutOfRange {
        line: hunk.old_start,
        len: old_lines.len(),
      });
    }

    new_lines.extend_from_slice(&old_lines[cursor..start]);
    cursor = start;

    for line in &hunk.lines {
      match line {
        HunkLine::Context(expected) | HunkLine::Delete(expected) => {
          let Some(actual) = old_lines.get(cursor) else {
            return Err(PatchError::HunkOutOfRange {
              line: cursor + 1,
              len: old_lines.len(),
            });
          };
          if actual.strip_suffix('\n').unwrap_or(actual) != expected.as_str() {
            return Err(PatchError::ContextMismatch {
              line: cursor + 1,
              expected: expected.clone(),
              actual: actual.trim_end_matches('\n').to_string(),
            });
          }
          if matches!(line, HunkLine::Context(_)) {
            new_lines.push(actual.clone());
          }
          cursor += 1;
        }
        HunkLine::Insert { text, newline } => {
          if *newline {
            new_lines.push(format!("{}\n", text));
          } else {
            new_lines.push(text.clone());
          }
        }
      }
    }
  }

  new_lines.extend_from_slice(&old_lines[cursor..]);
  Ok(new_lines.concat())
}
