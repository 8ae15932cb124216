//! Porting Bundle Summary
//! Builds a bundle in memory and prints it as a console report
//!
//! Run: ./target/release/bundle_summary --input raw-data/portabilidad.csv [--target-month 2025-01]

use anyhow::Result;
use clap::Parser;
use porting_analytics::{
    assemble,
    loader,
    operators::Operator,
    period::Period,
    rollup::BucketTotal,
    EngineConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bundle_summary")]
#[command(about = "Print the analytics bundle for a target month")]
struct Args {
    #[arg(long, default_value = "raw-data/portabilidad.csv")]
    input: PathBuf,

    #[arg(long)]
    target_month: Option<String>,

    /// Trailing months of net series to print (overrides the configured window)
    #[arg(long)]
    net_months: Option<usize>,
}

fn print_section(title: &str) {
    println!("\n{}", title);
    println!("{}", "-".repeat(60));
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

fn print_buckets(name: &str, buckets: &[BucketTotal]) {
    println!("  {}", name);
    for b in buckets {
        println!("    {}  {:>12}", b.period_end, b.lines);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let target = args
        .target_month
        .as_deref()
        .map(str::parse::<Period>)
        .transpose()?;

    let config = EngineConfig::default().with_windows(None, args.net_months);

    let records = loader::load_csv(&args.input)?;
    let bundle = assemble(&records, target, &config)?;

    println!("\n{}", "=".repeat(60));
    println!("      MOBILE NUMBER PORTABILITY - {}", bundle.target_period.key());
    println!("{}", "=".repeat(60));

    print_section("OVERVIEW");
    println!("  Layout:          {:?}", bundle.layout);
    println!("  Months of data:  {:>10}", bundle.monthly_total.len());
    println!("  MoM change:      {:>10}", fmt_pct(bundle.comparatives.mom_delta_pct));
    println!("  YoY change:      {:>10}", fmt_pct(bundle.comparatives.yoy_delta_pct));
    println!("  Net chart:       {:>10}", bundle.recommendations.include_net_chart);

    print_section("PORTED LINES (CHART WINDOW)");
    let peak = bundle.chart_window.values.iter().copied().max().unwrap_or(0).max(1);
    for (label, value) in bundle.chart_window.labels.iter().zip(&bundle.chart_window.values) {
        let bar = "#".repeat((u128::from(*value) * 30 / u128::from(peak)) as usize);
        println!("  {:8} {:>10} {}", label, value, bar);
    }

    print_section("OPERATOR RESULT (TARGET MONTH)");
    println!("  {:12} {:>10} {:>10} {:>10}", "Operator", "Won", "Lost", "Net");
    for row in bundle.operators_current.iter().chain(&bundle.other_operators) {
        println!("  {:12} {:>10} {:>10} {:>+10}", row.name, row.won, row.lost, row.net);
    }

    print_section("NET BY OPERATOR (TRAILING)");
    let window = bundle.net_window(config.net_window_months);
    print!("  {:8}", "");
    for op in Operator::ALL {
        print!(" {:>10}", op.code());
    }
    println!();
    for (i, period) in window.index.iter().enumerate() {
        print!("  {:8}", period.label());
        for op in Operator::ALL {
            print!(" {:>+10}", window.series[op][i]);
        }
        println!();
    }

    print_section("PERIOD TOTALS");
    print_buckets("Quarterly", &bundle.period_totals.quarterly);
    print_buckets("Semiannual", &bundle.period_totals.semiannual);
    print_buckets("Annual", &bundle.period_totals.annual);

    println!("\n{}", "=".repeat(60));
    Ok(())
}
