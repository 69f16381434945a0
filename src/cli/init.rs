//! Init command implementation

use anyhow::{Context, Result};
use clap::Args;
use dml_common::config::paths::default_config_file;
use dml_common::config::{packaged_defaults, write_missing_defaults, ResolvedSettings};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Settings file to update (defaults to the user settings file)
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,
}

pub fn run(args: InitArgs, settings: &ResolvedSettings) -> Result<()> {
    let path = match args.path.or_else(|| settings.config_file().map(PathBuf::from)) {
        Some(path) => path,
        None => default_config_file()?,
    };

    let defaults = packaged_defaults()?;
    let written = write_missing_defaults(&path, &defaults)
        .with_context(|| format!("Failed updating {}", path.display()))?;

    if written {
        tracing::info!("Added missing defaults to {}", path.display());
        println!("Updated {}", path.display());
    } else {
        println!("{} already has every default key", path.display());
    }
    Ok(())
}
