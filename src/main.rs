use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use map_generator::{Adjacency, OutflowMode, PngRenderer, World, WorldParams};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutflowArg {
    /// Subtract the full potential sum (legacy, may go negative)
    Replicate,
    /// Never move more water than a cell holds
    Clamp,
}

impl From<OutflowArg> for OutflowMode {
    fn from(arg: OutflowArg) -> Self {
        match arg {
            OutflowArg::Replicate => OutflowMode::ReplicateReference,
            OutflowArg::Clamp => OutflowMode::ClampToAvailable,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AdjacencyArg {
    /// Strict four-connected neighbors
    Cardinal,
    /// Legacy flat-index neighbors (wraps across row ends)
    FlatIndex,
}

impl From<AdjacencyArg> for Adjacency {
    fn from(arg: AdjacencyArg) -> Self {
        match arg {
            AdjacencyArg::Cardinal => Adjacency::Cardinal,
            AdjacencyArg::FlatIndex => Adjacency::FlatIndex,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "map_generator")]
#[command(about = "Generate a terrain height map and simulate rainfall over it")]
struct Args {
    /// Width of the map in cells
    #[arg(short = 'W', long, default_value = "1000")]
    width: usize,

    /// Height of the map in cells
    #[arg(short = 'H', long, default_value = "1000")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rain + flow rounds
    #[arg(long)]
    iterations: Option<usize>,

    /// Rain drops per round
    #[arg(long)]
    drops: Option<usize>,

    /// Outflow rule for the flow step
    #[arg(long, value_enum)]
    outflow: Option<OutflowArg>,

    /// Neighbor rule for the flow step
    #[arg(long, value_enum)]
    adjacency: Option<AdjacencyArg>,

    /// Directory for height.png and water.png
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Log an elevation histogram
    #[arg(long)]
    histogram: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => WorldParams::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WorldParams::default(),
    };
    if let Some(iterations) = args.iterations {
        params.water.iterations = iterations;
    }
    if let Some(drops) = args.drops {
        params.water.drops_per_iteration = drops;
    }
    if let Some(outflow) = args.outflow {
        params.water.outflow = outflow.into();
    }
    if let Some(adjacency) = args.adjacency {
        params.water.adjacency = adjacency.into();
    }

    info!(
        width = args.width,
        height = args.height,
        outflow = %params.water.outflow,
        adjacency = %params.water.adjacency,
        "map size {}x{}",
        args.width,
        args.height
    );

    let mut world = World::try_new(args.width, args.height)?;
    let report = world.generate(args.seed, &params);
    info!(seed = report.seed, "generation complete");
    info!(
        "water: {:.1} deposited, {:.1} remaining, depth {:.2} to {:.2}, {} negative cells",
        report.water.rain_deposited,
        report.water.depth.total,
        report.water.depth.min,
        report.water.depth.max,
        report.water.depth.negative_cells
    );

    if args.histogram {
        info!("elevation histogram:");
        for line in report.elevation.histogram_lines(50) {
            info!("{}", line);
        }
    }

    let renderer = PngRenderer::new(&args.output);
    world.render(&renderer).context("rendering maps")?;

    Ok(())
}
