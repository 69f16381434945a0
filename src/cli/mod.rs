//! Command-line interface for dml-common
//!
//! Settings flags (`-q`, `-v`, `-l`, `--config-file`, `-V`) are taken out of
//! the arguments first; clap only sees what is left.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dml_common::config::Resolver;
use dml_common::logging::{self, LogOptions};

mod exec;
mod init;
mod show;

const LOG_FILE_NAME: &str = "dml-common.log";

/// Inspect and initialise layered settings
#[derive(Parser)]
#[command(name = "dml-common")]
#[command(author, about, long_about = None)]
#[command(after_help = "Settings flags (accepted anywhere before `--`):
  -q, --quiet                 Decrease logging level to WARNING
  -v, --verbose               Increase logging level to DEBUG
      --config-file <PATH>    Override config file [env: DMLANE_CONFIG_FILE]
  -l, --log-directory <PATH>  Override log directory
  -V, --version               Print version information and exit")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged settings
    Show(show::ShowArgs),

    /// List the settings sources in the order they were applied
    Sources(show::SourcesArgs),

    /// Add missing default keys to the user settings file
    Init(init::InitArgs),

    /// Run a command and log how long it took
    Run(exec::ExecArgs),
}

pub fn run() -> Result<()> {
    let settings = Resolver::new().from_env()?;
    settings.show_version(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse_from(settings.remaining_args());
    logging::init(&settings, LOG_FILE_NAME, &LogOptions::default())?;

    match cli.command {
        Commands::Show(args) => show::run(args, &settings),
        Commands::Sources(args) => show::sources(args, &settings),
        Commands::Init(args) => init::run(args, &settings),
        Commands::Run(args) => exec::run(args),
    }
}
