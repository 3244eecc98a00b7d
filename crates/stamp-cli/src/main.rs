//! Stamp CLI - Content-addressed asset hashing from the command line

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{fingerprint, hash, resolve, verify};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stamp")]
#[command(about = "Copy assets under content-fingerprinted names and write a lookup manifest", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a source tree into the output tree and write the manifest
    Hash(hash::HashArgs),

    /// Print the physical path for a logical path
    Resolve {
        /// Logical path as written in the source tree (e.g. post/tonemap.frag)
        logical: String,

        /// Manifest file (defaults to the configured manifest)
        #[arg(long)]
        manifest: Option<String>,

        /// Config file to use instead of the layered lookup
        #[arg(long)]
        config: Option<String>,
    },

    /// Check that the output tree matches its manifest
    Verify {
        /// Output directory (defaults to the configured output)
        #[arg(long)]
        out: Option<String>,

        /// Manifest file (defaults to the configured manifest)
        #[arg(long)]
        manifest: Option<String>,

        /// Config file to use instead of the layered lookup
        #[arg(long)]
        config: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Print the fingerprint of one or more files
    Fingerprint {
        /// Files to fingerprint
        #[arg(required = true)]
        files: Vec<String>,

        /// Print the full SHA-256 digest instead of the short form
        #[arg(long)]
        full: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Hash(args) => hash::run(args),
        Commands::Resolve {
            logical,
            manifest,
            config,
        } => resolve::run(&logical, manifest.as_deref(), config.as_deref()),
        Commands::Verify {
            out,
            manifest,
            config,
            format,
        } => verify::run(verify::VerifyArgs {
            out,
            manifest,
            config,
            format,
        }),
        Commands::Fingerprint { files, full } => fingerprint::run(&files, full),
    }
}
