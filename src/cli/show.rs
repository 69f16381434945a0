//! Show and sources command implementations

use anyhow::Result;
use clap::Args;
use dml_common::config::ResolvedSettings;
use serde_json::json;

#[derive(Args)]
pub struct ShowArgs {
    /// Print as JSON instead of an indented tree
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SourcesArgs {
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs, settings: &ResolvedSettings) -> Result<()> {
    let log_directory = settings.log_directory()?;

    if args.json {
        let report = json!({
            "settings": settings.view().as_table(),
            "log_level": settings.log_level(),
            "log_directory": log_directory,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", settings.view().render());
    println!();
    println!("Effective log level: {}", settings.log_level());
    println!("Log directory: {}", log_directory.display());
    Ok(())
}

pub fn sources(args: SourcesArgs, settings: &ResolvedSettings) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(settings.sources())?);
        return Ok(());
    }

    for record in settings.sources() {
        let state = if record.present { "loaded" } else { "absent" };
        println!(
            "{:>3}  {:<8} {:<6}  {}",
            record.rank,
            record.origin.as_str(),
            state,
            record.location
        );
    }
    Ok(())
}
