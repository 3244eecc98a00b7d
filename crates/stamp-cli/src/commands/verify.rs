//! Output tree verification command

use super::load_config;
use anyhow::{Context, Result};
use stamp_asset::{verify_output, Manifest, VerifyReport};
use std::path::PathBuf;

pub struct VerifyArgs {
    pub out: Option<String>,
    pub manifest: Option<String>,
    pub config: Option<String>,
    pub format: String,
}

pub fn run(args: VerifyArgs) -> Result<()> {
    let (output_dir, manifest_path) = match (args.out, args.manifest) {
        (Some(out), Some(manifest)) => (PathBuf::from(out), PathBuf::from(manifest)),
        (out, manifest) => {
            let config = load_config(args.config.as_deref())?;
            (
                out.map(PathBuf::from).unwrap_or(config.output_dir),
                manifest.map(PathBuf::from).unwrap_or(config.manifest),
            )
        }
    };

    let manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
    let report = verify_output(&output_dir, &manifest)?;

    if args.format == "json" {
        print_report_json(&report)?;
    } else {
        print_report_text(&report);
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} does not match {}",
            output_dir.display(),
            manifest_path.display()
        );
    }
    Ok(())
}

fn print_report_text(report: &VerifyReport) {
    if report.is_clean() {
        println!("All {} file(s) verified.", report.ok.len());
        return;
    }

    println!(
        "{} ok, {} missing, {} mismatched, {} stray",
        report.ok.len(),
        report.missing.len(),
        report.mismatched.len(),
        report.stray.len()
    );
    println!();

    for logical in &report.missing {
        println!("  [MISSING]  {}", logical);
    }
    for m in &report.mismatched {
        println!(
            "  [MISMATCH] {} ({}: expected {}, got {})",
            m.logical, m.physical, m.expected, m.actual
        );
    }
    for path in &report.stray {
        println!("  [STRAY]    {}", path);
    }
}

fn print_report_json(report: &VerifyReport) -> Result<()> {
    let output = serde_json::json!({
        "clean": report.is_clean(),
        "ok": report.ok,
        "missing": report.missing,
        "mismatched": report.mismatched,
        "stray": report.stray,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
