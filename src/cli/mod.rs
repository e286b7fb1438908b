//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing with one subcommand per tool:
//! `generate` builds (and optionally applies) header diffs and `apply`
//! replays a saved aggregate patch.

mod apply;
mod generate;

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use apply::{ApplyArgs, run_apply};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
pub use generate::{GenerateArgs, run_generate};

use crate::config::{Config, load_config};
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Preview header diffs for the first 30 matched ports
  headerport generate --source-root ../common-shaders

  # Save every diff into a reviewable patch without printing bodies
  headerport -q generate --max-pairs 1000 --save-diff tools/license_diffs_all.patch

  # Insert the headers, keep .bak backups and commit the result
  headerport generate --apply --max-pairs 1000

  # Replay a reviewed patch against the current tree
  headerport apply tools/license_diffs_all.patch --root .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub global: GlobalArgs,

  #[command(subcommand)]
  pub command: Command,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
  /// Path to config file (default: .headerport.toml in the current directory)
  #[arg(long, value_name = "FILE", global = true)]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long, global = true)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum,
    global = true
  )]
  pub colors: ColorMode,
}

impl GlobalArgs {
  /// Sets up tracing, the output mode and colors.
  pub fn init_output(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }

  /// Loads the config file selected by `--config`/`--no-config`.
  pub fn load_config(&self) -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config(self.config.as_deref(), &current_dir, self.no_config)
  }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Pair ported targets with their sources and carry license headers over
  Generate(GenerateArgs),

  /// Apply a saved aggregate patch to the target tree
  Apply(ApplyArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Runs the selected subcommand.
  pub fn run(self) -> Result<()> {
    self.global.init_output();
    let config = self.global.load_config()?;

    match self.command {
      Command::Generate(args) => run_generate(args, &config),
      Command::Apply(args) => run_apply(args, &config),
    }
  }
}
