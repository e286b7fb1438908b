//! # Header Module
//!
//! Turns the head of a Cg/HLSL source file into a block comment that can be
//! dropped into a Slang target:
//!
//! - [`extract`] - isolates the comment block at the top of a file
//! - [`narrow`] - trims that block down to its license paragraph
//! - [`convert`] - rewrites the result as a `/* ... */` block
//!
//! [`plan_header`] chains the three steps and reports why a source was
//! rejected when no usable header comes out of it.

mod convert;
mod extract;
mod narrow;

pub use convert::convert_to_block_comment;
pub use extract::extract_top_comment_block;
pub use narrow::{extract_license_paragraph, strip_compat_lines};

use crate::license_detection::contains_license;

/// What the header pipeline produced for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPlan {
  /// The source has no comment block at its top.
  NoSourceHeader,
  /// The comment block holds no license text once compat lines are removed.
  NoLicenseKeywords,
  /// Block-comment header ready to be spliced into a target.
  Header(Vec<String>),
}

/// Builds the header to copy from the leading lines of a source file.
///
/// The license paragraph is preferred; when no keyword line is found the
/// compat-stripped block is used instead, provided a keyword survives.
pub fn plan_header(source_head: &[String]) -> HeaderPlan {
  let comment = extract_top_comment_block(source_head);
  if comment.is_empty() {
    return HeaderPlan::NoSourceHeader;
  }

  let paragraph = extract_license_paragraph(&comment);
  let header_source = if paragraph.is_empty() {
    let stripped = strip_compat_lines(&comment);
    if stripped.is_empty() || !contains_license(&stripped) {
      return HeaderPlan::NoLicenseKeywords;
    }
    stripped
  } else {
    paragraph.to_vec()
  };

  HeaderPlan::Header(convert_to_block_comment(&header_source))
}

/// Splits text into lines, keeping each line's `\n` terminator.
///
/// The last line has no terminator when the text does not end with one.
pub fn split_lines(text: &str) -> Vec<String> {
  text.split_inclusive('\n').map(str::to_string).collect()
}
