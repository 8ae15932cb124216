//! Build the analytics bundle for one target month
//!
//! Usage:
//!   porting_analytics --input raw-data/portabilidad.csv [--target-month 2025-01] [--output-dir data/eda]

use anyhow::{Context, Result};
use clap::Parser;
use porting_analytics::{
    assemble, loader,
    period::Period,
    policy::RecommendationPolicy,
    store::{BundleSink, DirectorySink},
    EngineConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "porting_analytics")]
#[command(about = "Build the monthly number-portability analytics bundle")]
struct Args {
    /// Registry export (CSV with cedente, receptor, mes, lineas columns)
    #[arg(long, default_value = "raw-data/portabilidad.csv")]
    input: PathBuf,

    /// Target month (YYYY-MM or any date in the month); defaults to the latest month in the data
    #[arg(long)]
    target_month: Option<String>,

    /// Directory the bundle is written to
    #[arg(long, default_value = "data/eda")]
    output_dir: PathBuf,

    /// JSON file overriding the recommendation policy
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Trailing months in the totals chart window (default 16)
    #[arg(long)]
    chart_months: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::default().with_windows(args.chart_months, None);
    if let Some(path) = &args.policy {
        config.policy = RecommendationPolicy::from_path(path)
            .with_context(|| format!("loading policy from {}", path.display()))?;
        info!("Loaded recommendation policy from {:?}", path);
    }

    let target = args
        .target_month
        .as_deref()
        .map(str::parse::<Period>)
        .transpose()?;

    let records = loader::load_csv(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let bundle = assemble(&records, target, &config)?;
    info!(
        "Target {} | layout {:?} | net chart {}",
        bundle.target_period.key(),
        bundle.layout,
        bundle.recommendations.include_net_chart
    );

    let sink = DirectorySink::new(args.output_dir.clone());
    let path = sink.persist(&bundle)?;
    println!("{}", path.display());

    Ok(())
}
