//! # Logging Module
//!
//! Logging utilities for headerport:
//! - `tracing` diagnostics controlled by `-v`/`-q` and `RUST_LOG`
//! - verbose logging that can be enabled/disabled
//! - standard info logging with color support
//!
//! Verbose logs go to stderr and info logs go to stdout, so a dry run can be
//! piped straight into a patch file.
//!
//! ## Example
//!
//! ```rust
//! use headerport::logging::{ColorMode, set_verbose};
//! use headerport::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Auto.apply();
//!
//! // Goes to stderr
//! verbose_log!("Reading head of: {}", "crt-easymode.cg");
//!
//! // Goes to stdout
//! info_log!("-- APPLIED: {}", "crt-easymode.slang");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
///
/// Uses the same format string syntax as [`println!`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message, colored when the terminal supports it.
///
/// Used by the [`info_log!`] macro.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
