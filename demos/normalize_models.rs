//! Reduce one model to another model's vertex count and export the result

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pointmorph_io::{load_merged, write_ply_points};
use pointmorph_simplification::{normalize, Decimator, PairCollapseDecimator, StrideDecimator};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    PairCollapse,
    Stride,
}

#[derive(Parser, Debug)]
#[command(about = "Match a model's point count to a target model")]
struct Args {
    /// Model to decimate (OBJ or PLY)
    source: PathBuf,

    /// Model whose point count is matched
    target: PathBuf,

    /// Output PLY file
    #[arg(short, long, default_value = "normalized.ply")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Method::PairCollapse)]
    method: Method,

    /// Pair-collapse distance limit
    #[arg(long)]
    max_distance: Option<f32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let source = load_merged(&args.source)?;
    let target = load_merged(&args.target)?;
    println!("Source: {} points", source.len());
    println!("Target: {} points", target.len());

    let decimator: Box<dyn Decimator> = match args.method {
        Method::PairCollapse => Box::new(PairCollapseDecimator::with_params(args.max_distance)),
        Method::Stride => Box::new(StrideDecimator::new()),
    };

    let start = Instant::now();
    let normalized = normalize(&source, &target, &decimator)?;
    println!(
        "Delta {} -> {} points in {:?} (residual {})",
        normalized.delta.value(),
        normalized.cloud.len(),
        start.elapsed(),
        normalized.residual
    );

    write_ply_points(&normalized.cloud, &args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
