//! Narrative number audit
//! Lists numbers quoted in a narrative that do not appear in the bundle it was written from
//!
//! Run: ./target/release/audit_narrative --bundle data/eda/bundle_2025-01.json --text reports/nota.txt

use anyhow::{Context, Result};
use clap::Parser;
use porting_analytics::audit::unmatched_numbers;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "audit_narrative")]
#[command(about = "Check that every figure in a narrative comes from the bundle")]
struct Args {
    /// Persisted bundle JSON
    #[arg(long)]
    bundle: PathBuf,

    /// Narrative text file
    #[arg(long)]
    text: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let bundle = std::fs::read_to_string(&args.bundle)
        .with_context(|| format!("reading {}", args.bundle.display()))?;
    let text = std::fs::read_to_string(&args.text)
        .with_context(|| format!("reading {}", args.text.display()))?;

    // Validate the bundle is JSON before matching against it
    serde_json::from_str::<serde_json::Value>(&bundle)
        .with_context(|| format!("parsing {}", args.bundle.display()))?;

    let misses = unmatched_numbers(&text, &bundle);
    info!("Checked narrative against {:?}", args.bundle);
    if misses.is_empty() {
        println!("All numbers found in bundle: OK");
    } else {
        println!("Numbers not found in bundle ({}):", misses.len());
        for n in &misses {
            println!("  {}", n);
        }
        std::process::exit(1);
    }

    Ok(())
}
