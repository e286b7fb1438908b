use std::sync::LazyLock;

use regex::Regex;

use super::split_lines;

static LINE_MARKER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*//\s?(.*)$").expect("line marker regex must compile"));

static BLOCK_OPEN_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*/\*+\s?").expect("block open regex must compile"));

static BLOCK_CLOSE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s*\*+/\s*$").expect("block close regex must compile"));

static BARE_MARKER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*(/\*+|\*+/)\s*$").expect("bare marker regex must compile"));

static BLOCK_CONTINUATION_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*\*\s?").expect("block continuation regex must compile"));

/// Rewrites a comment block as a single `/* ... */` comment.
///
/// A complete block comment is returned as-is apart from a trailing newline.
/// Anything else (`//` runs, or fragments of a block comment cut out by the
/// paragraph narrower) loses its comment markers and is re-wrapped as
///
/// ```text
/// /*
///  * first line
///  *
///  * after a blank line
///  */
/// ```
pub fn convert_to_block_comment(comment_lines: &[String]) -> Vec<String> {
  if comment_lines.is_empty() {
    return Vec::new();
  }

  let mut text = comment_lines.concat();
  let trimmed = text.trim_start();
  if trimmed.starts_with("/*") && trimmed.contains("*/") {
    if !text.ends_with('\n') {
      text.push('\n');
    }
    return split_lines(&text);
  }

  // A lone `/*` or `*/` at either edge would become an empty continuation.
  let is_bare_marker = |line: &str| BARE_MARKER_REGEX.is_match(line.trim_end_matches(['\n', '\r']));
  let start = comment_lines
    .iter()
    .take_while(|line| is_bare_marker(line.as_str()))
    .count();
  let trailing = comment_lines[start..]
    .iter()
    .rev()
    .take_while(|line| is_bare_marker(line.as_str()))
    .count();
  let body_lines = &comment_lines[start..comment_lines.len() - trailing];

  let mut block = Vec::with_capacity(body_lines.len() + 2);
  block.push("/*\n".to_string());
  for line in body_lines {
    let body = strip_comment_marker(line);
    if body.is_empty() {
      block.push(" *\n".to_string());
    } else {
      block.push(format!(" * {}\n", body));
    }
  }
  block.push(" */\n".to_string());
  block
}

/// Returns the text of one comment line without its markers or line ending.
fn strip_comment_marker(line: &str) -> String {
  let line = line.trim_end_matches(['\n', '\r']);

  if let Some(caps) = LINE_MARKER_REGEX.captures(line) {
    return caps[1].trim_end().to_string();
  }

  if line.trim().is_empty() {
    return String::new();
  }

  let without_close = BLOCK_CLOSE_REGEX.replace(line, "");
  let body = if BLOCK_OPEN_REGEX.is_match(&without_close) {
    BLOCK_OPEN_REGEX.replace(&without_close, "").into_owned()
  } else {
    BLOCK_CONTINUATION_REGEX.replace(&without_close, "").into_owned()
  };

  body.trim_end().to_string()
}
