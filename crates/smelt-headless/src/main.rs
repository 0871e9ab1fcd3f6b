use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use smelt_core::{Sandbox, TickStats};
use smelt_headless::HeadlessConfig;
use smelt_headless::scenario::{ScenarioDefinition, ScenarioExecutor, ScenarioExecutorConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (RON); defaults to ./smelt.ron if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario file (RON) to execute instead of a plain tick loop
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Ticks to run without a scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// World width in cells
    #[arg(long)]
    width: Option<usize>,

    /// World height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Seed for the simulation random source
    #[arg(long)]
    seed: Option<u64>,

    /// Ambient temperature in Kelvin
    #[arg(long)]
    ambient: Option<f32>,

    /// Save the final frame as a PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Directory for scenario snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    /// Write the scenario report (RON) here
    #[arg(long)]
    report: Option<PathBuf>,

    /// List built-in materials and exit
    #[arg(long)]
    list_materials: bool,
}

impl Args {
    /// Command-line flags win over every other configuration layer
    fn apply_to(&self, config: &mut HeadlessConfig) {
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(seed) = self.seed {
            config.world.seed = seed;
        }
        if let Some(ambient) = self.ambient {
            config.world.ambient_temperature = ambient;
        }
        if let Some(ticks) = self.ticks {
            config.run.ticks = ticks;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_materials {
        list_materials();
        return Ok(());
    }

    let mut config = HeadlessConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    let world = &config.world;
    let mut sandbox = Sandbox::new(world.width, world.height, world.ambient_temperature, world.seed)
        .with_context(|| format!("Failed to create {}x{} world", world.width, world.height))?;
    sandbox.set_spawner_temperature(world.spawner_temperature);

    log::info!(
        "World {}x{} at {}K (seed {})",
        world.width,
        world.height,
        world.ambient_temperature,
        world.seed
    );

    let passed = match &args.scenario {
        Some(path) => run_scenario(&args, &config, &mut sandbox, path)?,
        None => {
            run_ticks(&config, &mut sandbox);
            true
        }
    };

    if let Some(path) = &args.snapshot {
        smelt_headless::snapshot::save_png(
            sandbox.world(),
            config.world.background_color,
            path,
        )?;
    }

    if !passed {
        anyhow::bail!("Scenario verification failed");
    }
    Ok(())
}

fn run_scenario(
    args: &Args,
    config: &HeadlessConfig,
    sandbox: &mut Sandbox,
    path: &std::path::Path,
) -> Result<bool> {
    let scenario = ScenarioDefinition::from_file(path)?;
    let executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
        snapshot_dir: args.snapshot_dir.clone(),
        background_color: config.world.background_color,
        report_every: config.run.report_every,
    });

    let report = executor.execute_scenario(&scenario, sandbox)?;

    if let Some(report_path) = &args.report {
        report.to_file(report_path)?;
        log::info!("Report saved: {}", report_path.display());
    }

    Ok(report.passed)
}

fn run_ticks(config: &HeadlessConfig, sandbox: &mut Sandbox) {
    let start = Instant::now();
    let every = config.run.report_every;
    let mut window = TickStats::default();
    let mut window_start = Instant::now();

    for _ in 0..config.run.ticks {
        window += sandbox.tick();

        if every > 0 && sandbox.ticks() % every == 0 {
            let elapsed = window_start.elapsed().as_secs_f64() * 1000.0;
            log::info!(
                "Tick {}: {} moved, {} state changes, {} reactions ({:.2}ms/tick)",
                sandbox.ticks(),
                window.cells_moved,
                window.state_changes,
                window.reactions,
                elapsed / every as f64
            );
            window = TickStats::default();
            window_start = Instant::now();
        }
    }

    let totals = sandbox.totals();
    log::info!(
        "Ran {} ticks in {:.1}ms: {} moved, {} state changes, {} reactions, total heat {:.1}",
        sandbox.ticks(),
        start.elapsed().as_secs_f64() * 1000.0,
        totals.cells_moved,
        totals.state_changes,
        totals.reactions,
        sandbox.world().total_heat()
    );
}

fn list_materials() {
    let materials = smelt_core::Materials::shared();
    println!("{:>3}  {:<20} {:<10} {:>8} {:>8} {:>8}", "id", "name", "symbol", "density", "melt", "boil");
    for def in materials.iter() {
        println!(
            "{:>3}  {:<20} {:<10} {:>8.2} {:>8.1} {:>8.1}",
            def.id, def.name, def.symbol, def.density, def.melting_point, def.boiling_point
        );
    }
}
