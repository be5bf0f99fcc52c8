//! Blobtown
//!
//! Headless host loop: builds a session from tuning.toml, drives it tick by
//! tick and writes the city layout plus periodic frames for a renderer.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use town_sim::events::FrameLogger;
use town_sim::output::write_city;
use town_sim::{Config, Session, Variant};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "blobtown")]
#[command(about = "Blob infection and commuter simulation over a grid town")]
struct Args {
    /// Tuning file (defaults to tuning.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Population to run: outbreak or commute
    #[arg(long)]
    variant: Option<Variant>,

    /// Interval between logged frames (in ticks)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for city.json and frames.jsonl
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Skip writing any files
    #[arg(long)]
    no_output: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if let Some(variant) = args.variant {
        config.simulation.variant = variant;
    }
    if let Some(interval) = args.snapshot_interval {
        config.simulation.snapshot_interval = interval;
    }

    let ticks = config.simulation.ticks;
    let interval = config.simulation.snapshot_interval;
    let mut session = Session::new(config)?;

    let mut logger = if args.no_output {
        FrameLogger::null()
    } else {
        fs::create_dir_all(&args.output)?;
        if let Some(layout) = session.simulation().layout() {
            let city_path = args.output.join("city.json");
            write_city(&layout.to_snapshot(), &city_path)?;
            tracing::info!("Wrote {}", city_path.display());
        }
        FrameLogger::new(args.output.join("frames.jsonl"))?
    };

    let simulation = session.simulation_mut();
    logger.log_session(&simulation.header())?;
    logger.log_events(&simulation.drain_events())?;
    logger.log_frame(&simulation.frame())?;

    for _ in 0..ticks {
        session.advance();

        let simulation = session.simulation_mut();
        logger.log_events(&simulation.drain_events())?;

        let tick = simulation.current_tick();
        if tick % interval == 0 {
            let frame = simulation.frame();
            tracing::info!(
                "[Tick {:>5}] {} / {} infected",
                tick,
                frame.infected_count,
                frame.agents.len()
            );
            logger.log_frame(&frame)?;
        }
    }

    let simulation = session.simulation_mut();
    let frame = simulation.frame();
    logger.log_frame(&frame)?;
    logger.flush()?;

    tracing::info!(
        "Simulation complete. Ran {} ticks: {} of {} agents infected, {} frames and {} events logged.",
        simulation.current_tick(),
        frame.infected_count,
        frame.agents.len(),
        logger.frame_count(),
        logger.event_count()
    );
    Ok(())
}
