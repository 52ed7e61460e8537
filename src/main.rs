use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use islandgen::export::{export_map_png, export_metadata, MapMetadata};
use islandgen::{GenerationSession, MapConfig};

#[derive(Parser, Debug)]
#[command(name = "islandgen")]
#[command(about = "Generate an island and divide it into counties")]
struct Args {
    /// JSON configuration file; command-line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Edge length of the square map in cells
    #[arg(short = 'S', long)]
    size: Option<usize>,

    /// Seed string; the same seed always yields the same map
    #[arg(short, long)]
    seed: Option<String>,

    /// Number of regions to aim for
    #[arg(short, long)]
    regions: Option<usize>,

    /// Regions smaller than this many cells are dropped
    #[arg(long)]
    min_region_cells: Option<usize>,

    /// Stop after island synthesis
    #[arg(long)]
    island_only: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "island.png")]
    output: PathBuf,

    /// Also write island metrics and county data as JSON
    #[arg(long)]
    metadata: Option<PathBuf>,
}

fn load_config(args: &Args) -> islandgen::Result<MapConfig> {
    let mut config = match &args.config {
        Some(path) => MapConfig::from_json(&fs::read_to_string(path)?)?,
        None => MapConfig::default(),
    };
    if let Some(size) = args.size {
        config.map_size = size;
    }
    if let Some(seed) = &args.seed {
        config.seed = seed.clone();
    }
    if let Some(regions) = args.regions {
        config.regions.target_regions = regions;
    }
    if let Some(min) = args.min_region_cells {
        config.regions.min_region_cells = min;
    }
    Ok(config)
}

fn run(args: &Args) -> islandgen::Result<()> {
    let config = load_config(args)?;
    println!("Generating island with seed: {}", config.seed);
    println!("Map size: {}x{}", config.map_size, config.map_size);

    let mut session = GenerationSession::new(config)?;
    let island = session.island();
    println!(
        "Land: {} cells ({:.1}%), elongation {:.2}, effective size {}x{}",
        island.land_cells,
        island.coverage * 100.0,
        island.effective_elongation,
        island.effective_width,
        island.effective_height
    );

    if !args.island_only {
        session.partition()?;
        let layout = session.refine()?;
        println!("Created {} counties", layout.regions.len());
        for region in &layout.regions {
            if let Some(county) = &region.county {
                let seat = match county.settlement {
                    Some((x, y)) => format!("seat at ({x}, {y})"),
                    None => "no seat".to_string(),
                };
                println!(
                    "  {:>3} {:<16} {:>7} cells, {seat}",
                    region.id, county.name, region.pixels
                );
            }
        }
    }

    export_map_png(session.island(), session.regions(), &args.output)?;
    println!("Map written to {}", args.output.display());

    if let Some(path) = &args.metadata {
        let metadata = MapMetadata::new(session.config(), session.island(), session.regions());
        export_metadata(&metadata, path)?;
        println!("Metadata written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
