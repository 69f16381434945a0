//! dml-common: inspect and initialise layered settings
//!
//! Resolves settings the same way every tool built on the library does,
//! then shows them, lists their sources, writes missing defaults or runs a
//! timed command with logging enabled.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
