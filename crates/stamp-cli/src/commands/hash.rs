//! Asset hashing command

use super::load_config;
use anyhow::{Context, Result};
use clap::Args;
use stamp_asset::AssetHasher;
use std::path::PathBuf;

#[derive(Args)]
pub struct HashArgs {
    /// Source directory to walk
    #[arg(long)]
    pub src: Option<String>,

    /// Output directory (deleted and rebuilt on every run)
    #[arg(long)]
    pub out: Option<String>,

    /// Manifest file to write
    #[arg(long)]
    pub manifest: Option<String>,

    /// Eligible filename suffix; repeat for several (e.g. --ext .glsl --ext .frag)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Do not copy source modification times onto hashed files
    #[arg(long)]
    pub no_preserve_mtime: bool,

    /// Config file to use instead of the layered lookup
    #[arg(long)]
    pub config: Option<String>,

    /// Print every logical -> physical mapping
    #[arg(long)]
    pub list: bool,
}

pub fn run(args: HashArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(src) = args.src {
        config.source_dir = PathBuf::from(src);
    }
    if let Some(out) = args.out {
        config.output_dir = PathBuf::from(out);
    }
    if let Some(manifest) = args.manifest {
        config.manifest = PathBuf::from(manifest);
    }
    if !args.extensions.is_empty() {
        config.extensions = args.extensions;
    }
    if args.no_preserve_mtime {
        config.preserve_mtime = false;
    }

    let options = config.hash_options()?;
    let hasher = AssetHasher::new(options);
    let manifest = hasher.run().with_context(|| {
        format!(
            "Failed to hash {} into {}",
            config.source_dir.display(),
            config.output_dir.display()
        )
    })?;

    println!(
        "Hashed {} file(s) -> {}",
        manifest.len(),
        config.manifest.display()
    );
    if args.list {
        for (logical, physical) in manifest.iter() {
            println!("  {} -> {}", logical, physical);
        }
    }

    Ok(())
}
