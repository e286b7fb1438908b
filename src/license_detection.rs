//! # License Detection Module
//!
//! Decides whether the head of a file already carries license text.
//! The detector sits behind a trait so the batch driver can be tested with a
//! stub and so a stricter detector can be swapped in later.

/// Substrings (lowercase) that mark a line as license text.
///
/// The order matters to [`extract_license_paragraph`](crate::header::extract_license_paragraph):
/// earlier keywords win when a header matches several of them.
pub const LICENSE_KEYWORDS: &[&str] = &[
  "copyright",
  "licensed",
  "spdx",
  "permission is hereby granted",
  "mit license",
  "bsd license",
];

/// Trait for license detectors.
///
/// Implementations decide whether a file already contains a license header
/// based on its leading lines.
pub trait LicenseDetector: Send + Sync {
  /// Returns `true` if the given leading lines appear to hold license text.
  fn has_license(&self, head: &[String]) -> bool;
}

/// Case-insensitive keyword search over [`LICENSE_KEYWORDS`].
pub struct KeywordLicenseDetector;

impl KeywordLicenseDetector {
  pub const fn new() -> Self {
    KeywordLicenseDetector
  }
}

impl Default for KeywordLicenseDetector {
  fn default() -> Self {
    Self::new()
  }
}

impl LicenseDetector for KeywordLicenseDetector {
  fn has_license(&self, head: &[String]) -> bool {
    contains_license(head)
  }
}

/// Returns `true` if any license keyword occurs in the lines joined by `\n`.
pub fn contains_license(lines: &[String]) -> bool {
  text_contains_license(&lines.join("\n"))
}

/// Returns `true` if a single line mentions a license keyword.
pub fn line_has_license_keyword(line: &str) -> bool {
  text_contains_license(line)
}

fn text_contains_license(text: &str) -> bool {
  let lower = text.to_lowercase();
  LICENSE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
