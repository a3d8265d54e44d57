mod viewer;

use clap::{Parser, Subcommand};
use glam::Vec2;
use log::info;
use sandglass_core::diagnostics::measure;
use sandglass_core::{Scene, SceneConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sandglass")]
#[command(about = "Sandglass - granular hourglass particle simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the hourglass headless and print a report
    Run {
        /// JSON scene file; defaults are used when omitted
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: u32,
        /// Frame duration in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Override the scene's placement seed
        #[arg(long)]
        seed: Option<u64>,
        /// Gravity direction as X,Y (screen coordinates, +y is down)
        #[arg(long, value_parser = parse_tilt, allow_hyphen_values = true)]
        tilt: Option<Vec2>,
        /// Log metrics every N frames (0 disables)
        #[arg(long, default_value_t = 0)]
        report_every: u32,
        /// Print final particle positions as x,y lines
        #[arg(long)]
        positions: bool,
    },
    /// Open an interactive window; arrow keys tilt gravity
    View {
        /// JSON scene file, reloaded whenever it changes
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Override the scene's placement seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            scene,
            frames,
            dt,
            seed,
            tilt,
            report_every,
            positions,
        } => run_headless(RunOptions {
            scene,
            frames,
            dt,
            seed,
            tilt,
            report_every,
            positions,
        }),
        Commands::View { scene, seed } => viewer::run(scene, seed),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct RunOptions {
    scene: Option<PathBuf>,
    frames: u32,
    dt: f32,
    seed: Option<u64>,
    tilt: Option<Vec2>,
    report_every: u32,
    positions: bool,
}

fn parse_tilt(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", value))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad X '{}': {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad Y '{}': {}", y, e))?;
    Ok(Vec2::new(x, y))
}

/// Load the scene file if given, then apply the seed override
pub(crate) fn load_config(
    path: Option<&Path>,
    seed: Option<u64>,
) -> Result<SceneConfig, sandglass_core::SceneError> {
    let mut config = match path {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run_headless(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(options.scene.as_deref(), options.seed)?;
    let mut scene = Scene::build(&config)?;
    if let Some(direction) = options.tilt {
        scene.tilt(direction);
    }

    info!("simulating {} frames at dt = {}", options.frames, options.dt);
    for frame in 1..=options.frames {
        scene.advance(options.dt);

        if options.report_every > 0 && frame % options.report_every == 0 {
            let metrics = measure(&scene.world, &scene.state);
            info!(
                "frame {}: overlap {:.4}, max speed {:.2}, energy {:.2}",
                frame, metrics.total_overlap, metrics.max_speed, metrics.kinetic_energy
            );
        }
    }

    // Print metrics
    println!("elapsed = {}", scene.elapsed);
    for (name, value) in measure(&scene.world, &scene.state).entries() {
        println!("{} = {}", name, value);
    }

    if options.positions {
        for p in scene.state.positions() {
            println!("{},{}", p.x, p.y);
        }
    }

    Ok(())
}
