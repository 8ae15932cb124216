//! Synthetic porting data generator
//!
//! Writes a registry-shaped CSV (cedente, receptor, modalities, month, lines)
//! with seeded random variation, for demos and manual runs of the engine.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --start <YYYY-MM>     First month (default: 2023-01)
//!   --months <N>          Number of months (default: 30)
//!   --monthly-lines <N>   Average ported lines per month (default: 550000)
//!   --jitter <F>          Relative corridor variation (default: 0.20)
//!   --seed <N>            Random seed for reproducibility (optional)
//!   --output <PATH>       Output CSV path (default: raw-data/portabilidad.csv)

use anyhow::Result;
use clap::Parser;
use csv::WriterBuilder;
use porting_analytics::models::CsvRecord;
use porting_analytics::period::Period;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate synthetic number-portability records")]
struct Args {
    #[arg(long, default_value = "2023-01")]
    start: String,

    #[arg(long, default_value = "30")]
    months: u32,

    #[arg(long, default_value = "550000")]
    monthly_lines: u64,

    #[arg(long, default_value = "0.20")]
    jitter: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "raw-data/portabilidad.csv")]
    output: PathBuf,
}

/// Legal entities with their relative share of porting traffic
const ENTITIES: [(&str, f64); 5] = [
    ("América Móvil Perú S.A.C.", 0.30),
    ("Telefónica del Perú S.A.A.", 0.30),
    ("Entel Perú S.A.", 0.22),
    ("Viettel Perú S.A.C.", 0.16),
    ("Guinea Mobile S.A.C.", 0.02),
];

const MODALITIES: [(&str, f64); 2] = [("Prepago", 0.8), ("Postpago", 0.2)];

/// Mild seasonality: quieter mid-year, busy at year end and January
fn seasonal_factor(month: u32) -> f64 {
    match month {
        1 | 12 => 1.15,
        6 | 7 => 0.9,
        _ => 1.0,
    }
}

fn corridor_lines(
    base: f64,
    from_share: f64,
    to_share: f64,
    modality_share: f64,
    jitter: f64,
    rng: &mut impl Rng,
) -> u64 {
    let factor = 1.0 + rng.gen_range(-jitter..=jitter);
    (base * from_share * to_share * modality_share * factor).max(0.0).round() as u64
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start: Period = args.start.parse()?;

    println!("Synthetic Porting Generator");
    println!("{}", "-".repeat(50));
    println!("Start:          {}", start.key());
    println!("Months:         {}", args.months);
    println!("Monthly lines:  {}", args.monthly_lines);
    println!("Jitter:         ±{:.1}%", args.jitter * 100.0);
    if let Some(seed) = args.seed {
        println!("Random seed:    {}", seed);
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&args.output)?;

    // Pair shares are normalized so the corridors add up to roughly monthly_lines
    let pair_mass: f64 = ENTITIES
        .iter()
        .flat_map(|(a, sa)| ENTITIES.iter().filter(move |(b, _)| a != b).map(move |(_, sb)| sa * sb))
        .sum();

    let mut rows = 0usize;
    let mut total = 0u64;
    for offset in 0..args.months {
        let Some(month) = start.forward(offset) else {
            break;
        };
        let base = args.monthly_lines as f64 * seasonal_factor(month.month()) / pair_mass;

        for (from, from_share) in ENTITIES {
            for (to, to_share) in ENTITIES {
                if from == to {
                    continue;
                }
                for (mod_from, share_from) in MODALITIES {
                    for (mod_to, share_to) in MODALITIES {
                        let lines = corridor_lines(
                            base,
                            from_share,
                            to_share,
                            share_from * share_to,
                            args.jitter,
                            &mut rng,
                        );
                        writer.serialize(CsvRecord {
                            cedente: from.to_string(),
                            receptor: to.to_string(),
                            mod_cedente: Some(mod_from.to_string()),
                            mod_receptor: Some(mod_to.to_string()),
                            mes: month.to_string(),
                            lineas: lines as f64,
                        })?;
                        rows += 1;
                        total += lines;
                    }
                }
            }
        }
    }

    writer.flush()?;

    println!("Generation complete");
    println!("{}", "-".repeat(50));
    println!("Rows written:   {:>10}", rows);
    println!("Total lines:    {:>10}", total);
    println!("Output file:    {}", args.output.display());

    Ok(())
}
