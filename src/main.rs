//! Headless effect expiry driver.
//!
//! Builds a world from a JSON scenario (or a random population), then runs the
//! effect expiry schedule tick by tick and reports what is left.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing)
//! 2. Insert resources, register observers, spawn the population
//! 3. For every tick: advance [`WorldTime`], run the schedule
//! 4. Log a census of the remaining effects
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --entities 10000 --seed 1
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use effectsweep::game::{build_schedule, census, run_ticks, setup_world, spawn_scenario};
use effectsweep::resources::effectconfig::EffectConfig;
use effectsweep::resources::effectscheduler::EffectScheduler;
use effectsweep::resources::scenario::Scenario;
use effectsweep::resources::worldtime::WorldTime;

/// Timed effect expiry simulation
#[derive(Parser)]
#[command(version, about = "Runs the timed effect expiry sweep over a simulated population.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON scenario with the initial effects. A random population is used when omitted.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Size of the random population.
    #[arg(long, default_value_t = 1000)]
    entities: usize,

    /// Seed for the random population.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run, overriding the configured duration.
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EffectConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using defaults");
        config = EffectConfig::with_path(&cli.config);
    }

    let scenario = match &cli.scenario {
        Some(path) => match Scenario::load_from_file(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
        None => {
            let mut rng = cli.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
            Scenario::random(cli.entities, &mut rng)
        }
    };

    let tick_ms = config.tick_ms;
    let ticks = cli.ticks.unwrap_or_else(|| config.tick_count());

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    setup_world(&mut world, config);
    spawn_scenario(&mut world, &scenario);
    info!("Before: {:?}", census(&mut world));

    let mut update = build_schedule();
    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    run_ticks(&mut world, &mut update, tick_ms, ticks);

    let now_ms = world.resource::<WorldTime>().elapsed_ms;
    let sweeps = world.resource::<EffectScheduler>().sweeps_run();
    info!("Ran {ticks} ticks ({now_ms}ms game time), {sweeps} sweeps");
    info!("After: {:?}", census(&mut world));
}
