use std::sync::LazyLock;

use regex::Regex;

use crate::license_detection::{LICENSE_KEYWORDS, line_has_license_keyword};

/// Lines mentioning shader compatibility rather than licensing.
static COMPAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(compat|compatibility|hlsl|cg|fx11|fx11 compilers|compilers?)\b").expect("compat regex must compile")
});

/// Short bullet entries such as `- HLSL compilers`.
static BULLET_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*[-*]\s*\w+").expect("bullet regex must compile"));

/// Returns the paragraph of `comment_lines` holding the license text.
///
/// Keywords are tried in [`LICENSE_KEYWORDS`] order. The first line holding
/// the first matching keyword is grown up and down through non-blank lines
/// that do not mention `compat`. The result is always a contiguous slice of
/// the input; it is empty when no keyword occurs at all.
pub fn extract_license_paragraph(comment_lines: &[String]) -> &[String] {
  let lower: Vec<String> = comment_lines.iter().map(|line| line.to_lowercase()).collect();
  let extends_paragraph = |line: &str| !line.trim().is_empty() && !line.contains("compat");

  for keyword in LICENSE_KEYWORDS {
    let Some(hit) = lower.iter().position(|line| line.contains(keyword)) else {
      continue;
    };

    let mut start = hit;
    while start > 0 && extends_paragraph(&lower[start - 1]) {
      start -= 1;
    }

    let mut end = hit;
    while end + 1 < lower.len() && extends_paragraph(&lower[end + 1]) {
      end += 1;
    }

    return &comment_lines[start..=end];
  }

  &[]
}

/// Drops compatibility notes and bullet lists from a comment block.
///
/// Lines holding a license keyword are always kept.
pub fn strip_compat_lines(comment_lines: &[String]) -> Vec<String> {
  comment_lines
    .iter()
    .filter(|line| {
      if line_has_license_keyword(line) {
        return true;
      }
      !COMPAT_REGEX.is_match(&line.to_lowercase()) && !BULLET_REGEX.is_match(line)
    })
    .cloned()
    .collect()
}
