//! CLI for pathtag.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pathtag_core::config;
use std::path::PathBuf;

use commands::{run_annotate, run_audit_har, run_completions, run_fetch, run_man, run_resolve};

/// Top-level CLI for pathtag.
#[derive(Debug, Parser)]
#[command(name = "pathtag")]
#[command(about = "pathtag: annotate signed download URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the logical path of a storage identifier.
    Resolve {
        /// Identifier such as cloudreve://my/Folder/File.ext
        identifier: String,
    },

    /// Annotate a saved signed-URL response using its saved request body.
    Annotate {
        /// File holding the JSON request body (with the `uris` array).
        #[arg(long, value_name = "FILE")]
        request: PathBuf,
        /// File holding the JSON response body.
        #[arg(long, value_name = "FILE")]
        response: PathBuf,
    },

    /// Replay the signed-URL exchanges of a HAR capture and report the annotations.
    AuditHar {
        /// Path to the HAR file.
        path: PathBuf,
    },

    /// Send a request through the annotating client and print the response body.
    Fetch {
        /// Absolute request URL.
        url: String,
        /// HTTP method (defaults to POST when a body is given, GET otherwise).
        #[arg(long, short = 'X')]
        method: Option<String>,
        /// JSON request body.
        #[arg(long, short = 'd')]
        body: Option<String>,
        /// Extra request header, "Name: value". Repeatable.
        #[arg(long = "header", short = 'H', value_name = "HEADER")]
        headers: Vec<String>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Resolve { identifier } => run_resolve(&identifier)?,
            CliCommand::Annotate { request, response } => {
                let cfg = load_config()?;
                run_annotate(&cfg, &request, &response)?;
            }
            CliCommand::AuditHar { path } => {
                let cfg = load_config()?;
                run_audit_har(&cfg, &path)?;
            }
            CliCommand::Fetch {
                url,
                method,
                body,
                headers,
            } => {
                let cfg = load_config()?;
                run_fetch(&cfg, url, method, body, &headers).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<config::PathtagConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}
