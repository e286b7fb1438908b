//! # Splice Module
//!
//! Inserts a converted license header into a target file while keeping its
//! directive prelude (`#version`, `#pragma`, `@` annotations) on top, where
//! the Slang preprocessor and shader-preset tooling expect to find it.

/// Number of leading lines scanned for prelude directives.
pub const PRELUDE_WINDOW: usize = 10;

/// Returns the number of leading lines that make up the prelude.
///
/// Within the first [`PRELUDE_WINDOW`] lines, lines starting with `#` or `@`
/// belong to the prelude, as do blank lines once a directive has been seen.
/// Scanning stops at the first other line.
pub fn prelude_len(lines: &[String]) -> usize {
  let mut prelude_end = 0;

  for (i, line) in lines.iter().take(PRELUDE_WINDOW).enumerate() {
    if line.starts_with('#') || line.starts_with('@') {
      prelude_end = i + 1;
    } else if line.trim().is_empty() && prelude_end > 0 {
      prelude_end = i + 1;
    } else {
      break;
    }
  }

  prelude_end
}

/// Builds the new content of a target file with `header` inserted.
///
/// The header goes right after the prelude, followed by a blank line unless
/// the next original line is already blank. Every original line is kept, so
/// the result has `original.len() + header.len()` lines, plus one for the
/// separating blank line when it is added. Only line terminators are ever
/// added: to the header's last line and to a prelude line that ends the file
/// without one.
pub fn splice_header(original: &[String], header: &[String]) -> Vec<String> {
  if header.is_empty() {
    return original.to_vec();
  }

  let prelude_end = prelude_len(original);
  let mut spliced = Vec::with_capacity(original.len() + header.len() + 1);

  spliced.extend_from_slice(&original[..prelude_end]);
  if let Some(last) = spliced.last_mut()
    && !last.ends_with('\n')
  {
    last.push('\n');
  }

  spliced.extend_from_slice(header);
  if let Some(last) = spliced.last_mut()
    && !last.ends_with('\n')
  {
    last.push('\n');
  }

  let next_is_blank = original.get(prelude_end).is_some_and(|line| line.trim().is_empty());
  if !next_is_blank {
    spliced.push("\n".to_string());
  }

  spliced.extend_from_slice(&original[prelude_end..]);
  spliced
}
