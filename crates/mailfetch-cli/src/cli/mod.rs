//! CLI for the mailfetch attachment engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mailfetch_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_config, run_decode};

/// Top-level CLI for mailfetch.
#[derive(Debug, Parser)]
#[command(name = "mailfetch")]
#[command(about = "mailfetch: resilient attachment retrieval and transfer decoding", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Decode a spooled attachment body with the given Content-Transfer-Encoding.
    Decode {
        /// File holding the raw (still encoded) body.
        input: PathBuf,

        /// Where to write the decoded bytes.
        output: PathBuf,

        /// Transfer encoding label, e.g. base64, quoted-printable, 7bit.
        #[arg(long, short = 'e', default_value = "")]
        encoding: String,

        /// Declared charset of the part (quoted-printable only).
        #[arg(long)]
        charset: Option<String>,
    },

    /// Compute SHA-256 of a file (e.g. a decoded attachment).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Show the config file location and the effective fetch settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Decode {
                input,
                output,
                encoding,
                charset,
            } => {
                run_decode(
                    &input,
                    &output,
                    &encoding,
                    charset.as_deref(),
                    cfg.decode_buffer_bytes(),
                )
                .await?
            }
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
