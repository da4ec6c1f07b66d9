use std::fs;
use std::sync::Arc;

use clap::Parser;
use log::info;

use analytic_tracer::cli::Args;
use analytic_tracer::error::SceneError;
use analytic_tracer::logger::init_logger;
use analytic_tracer::parallel::trace_batch;
use analytic_tracer::scene::{ load_rays, load_world };

fn main() -> Result<(), SceneError> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let world = load_world(&args.scene)?;
    let rays = load_rays(&args.rays)?;

    let hits = trace_batch(Arc::new(world), rays, args.threads);

    fs::write(&args.output, serde_json::to_string_pretty(&hits)?)?;
    info!("Saved {} hits to {}", hits.len(), args.output.display());
    Ok(())
}
