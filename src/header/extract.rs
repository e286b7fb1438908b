use std::sync::LazyLock;

use regex::Regex;

use super::split_lines;

static BLOCK_COMMENT_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)\A\s*(/\*.*?\*/)").expect("block comment regex must compile"));

static LINE_COMMENT_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*//").expect("line comment regex must compile"));

/// Extracts the comment block at the very top of a file.
///
/// A leading `/* ... */` comment wins; it is matched non-greedily, so only
/// the first block is returned and anything after its `*/` is left out.
/// Without one, leading `//` lines are collected together with any blank
/// lines between (or after) them, up to the first line of code.
///
/// Returns an empty vector when the file does not start with a comment.
pub fn extract_top_comment_block(lines: &[String]) -> Vec<String> {
  if lines.is_empty() {
    return Vec::new();
  }

  let joined = lines.concat();
  if let Some(block) = BLOCK_COMMENT_REGEX.captures(&joined).and_then(|caps| caps.get(1)) {
    return split_lines(block.as_str());
  }

  lines
    .iter()
    .take_while(|line| LINE_COMMENT_REGEX.is_match(line) || line.trim().is_empty())
    .cloned()
    .collect()
}
