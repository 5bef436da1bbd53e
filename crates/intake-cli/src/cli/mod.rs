//! CLI for the intake upload pipeline.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use intake_core::config;

use commands::{run_size, run_upload, UploadArgs};

/// Top-level CLI for intake.
#[derive(Debug, Parser)]
#[command(name = "intake")]
#[command(about = "intake: validate, name and store uploaded files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate and store the files described by a batch manifest.
    Upload(UploadArgs),

    /// Parse a byte size (e.g. 150k, 2M) and print it in bytes and human form.
    Size {
        /// Size value.
        value: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Upload(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_upload(&cfg, &args)?;
            }
            CliCommand::Size { value } => run_size(&value)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
