//! # headerport
//!
//! Carries license headers from an original shader tree over to its ported
//! counterpart.

use anyhow::Result;
use headerport::cli::Cli;

fn main() -> Result<()> {
  Cli::parse_args().run()
}
