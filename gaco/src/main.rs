use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use cutstock_rs::entities::{PartCatalog, Placement};
use cutstock_rs::stats::collect_stats;
use gaco::config::GACConfig;
use gaco::ga::GeneticOptimizer;
use gaco::io;
use gaco::io::cli::Cli;
use gaco::io::ext_repr::{ExtFailure, ExtJob, ExtSolution, ExtStats};
use gaco::io::layout_to_svg::sheet_to_svg;
use gaco::EPOCH;
use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let job = io::read_job(args.input_file.as_path())?;
    let config = match job.algorithm_settings {
        Some(settings) => settings,
        None => {
            warn!("[MAIN] job carries no algorithmSettings, using defaults");
            GACConfig::default()
        }
    };
    info!("[MAIN] running with {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("input file has no usable name")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {}",
                args.solution_folder.display()
            )
        })?;
    }
    let solution_path = args.solution_folder.join(format!("sol_{input_stem}.json"));

    match optimize(&job, config) {
        Ok((catalog, placements, stats)) => {
            let n_sheets = stats.sheets_count;
            io::write_json(&ExtSolution::new(&placements, stats), &solution_path)?;

            for sheet in 0..n_sheets {
                let svg_path = args
                    .solution_folder
                    .join(format!("sol_{input_stem}_{sheet}.svg"));
                let svg = sheet_to_svg(&catalog, &placements, sheet);
                io::write_svg(&svg, Path::new(&svg_path))?;
            }
            Ok(())
        }
        Err(err) => {
            io::write_json(&ExtFailure::new(format!("{err:#}")), &solution_path)?;
            Err(err)
        }
    }
}

fn optimize(job: &ExtJob, config: GACConfig) -> Result<(PartCatalog, Vec<Placement>, ExtStats)> {
    let details: Vec<(i64, i64)> = job.details.iter().map(|d| (d.width, d.height)).collect();
    let catalog = PartCatalog::new(job.sheet_width, job.sheet_height, &details)?;

    let rng = match config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let placements = GeneticOptimizer::new(catalog.clone(), config, rng).solve()?;
    let stats = collect_stats(&catalog, &placements, config.scrap_filter());
    info!(
        "[MAIN] {} parts on {} sheets, efficiency {:.1}%",
        placements.len(),
        stats.sheets_count,
        stats.efficiency
    );

    let ext_stats = ExtStats::new(&stats, EPOCH.elapsed().as_secs_f64());
    Ok((catalog, placements, ext_stats))
}
