//! Run command implementation

use anyhow::{Context, Result};
use clap::Args;
use dml_common::process::run_timed;
use std::io::{self, Write};
use std::process::Command;

#[derive(Args)]
pub struct ExecArgs {
    /// Command to run, followed by its arguments (put `--` before it)
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

pub fn run(args: ExecArgs) -> Result<()> {
    let (program, rest) = args.command.split_first().context("No command given")?;

    let output = run_timed(Command::new(program).args(rest))
        .with_context(|| format!("Failed to run {program}"))?;
    io::stdout().write_all(&output.stdout)?;
    io::stderr().write_all(&output.stderr)?;
    io::stdout().flush()?;

    tracing::info!("{} finished with {} in {}", program, output.status, output.elapsed_hms());
    println!("Elapsed: {}", output.elapsed_hms());

    if !output.success() {
        std::process::exit(output.code().unwrap_or(1));
    }
    Ok(())
}
