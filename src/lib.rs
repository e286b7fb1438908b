//! # headerport
//!
//! A tool that copies license headers from an original shader tree (Cg,
//! HLSL) into the files that were ported from it (Slang), matching files by
//! basename.
//!
//! `headerport generate` prints the proposed changes as unified diffs, or
//! with `--apply` rewrites the targets in place (keeping `.bak` backups) and
//! commits them. `headerport apply` replays a saved batch of those diffs.
//!
//! ## Features
//!
//! * Basename pairing of target and source trees with configurable extensions
//! * License paragraph extraction that drops shader-compatibility notes
//! * Line comments and block fragments rewritten as one `/* ... */` block
//! * Headers placed below `#version`/`#pragma`/`@` preludes
//! * Aggregate patch files that can be reviewed and replayed later
//! * Commits through libgit2, no `git` binary needed
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use headerport::diff::DiffManager;
//! use headerport::processor::{HeaderPorter, PorterConfig, ScanOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let porter = HeaderPorter::new(PorterConfig {
//!         scan: ScanOptions {
//!             target_root: PathBuf::from("slang-shaders"),
//!             source_root: PathBuf::from("common-shaders"),
//!             ..ScanOptions::default()
//!         },
//!         apply: false,
//!         commit_message: None,
//!         diff_manager: DiffManager::new(true, 200, None),
//!         license_detector: None,
//!     })?;
//!
//!     let summary = porter.run()?;
//!     println!("Examined {} pairs", summary.items.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Pairing and the `generate` batch
//! * [`header`] - Header extraction, narrowing and conversion
//! * [`patch`] - Parsing and applying aggregate patches
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod config;
pub mod diff;
pub mod git;
pub mod header;
pub mod license_detection;
pub mod logging;
pub mod output;
pub mod patch;
pub mod processor;
pub mod report;
