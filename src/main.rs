use nbsim::{build_simulation, sun_earth, ScenarioConfig};
use nbsim::{bench_gravity, bench_step};
use nbsim::{CsvReporter, EveryNth, Reporter, TextReporter};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Csv,
}

#[derive(Parser, Debug)]
#[command(about = "Direct-summation gravitational N-body simulator")]
struct Args {
    /// Scenario YAML file; the built-in Sun/Earth scenario is used when omitted
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Report every N steps
    #[arg(short, long, default_value_t = 100)]
    every: u64,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Evaluate forces on all cores
    #[arg(long)]
    parallel: bool,

    /// Run the sequential vs parallel benchmark instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    Ok(scenario_cfg)
}

fn run_scenario(mut cfg: ScenarioConfig, args: &Args) -> Result<()> {
    if args.parallel {
        cfg.parameters.parallel = true;
    }
    let mut sim = build_simulation(&cfg).context("invalid scenario")?;

    let out = BufWriter::new(io::stdout().lock());
    let inner: Box<dyn Reporter> = match args.format {
        Format::Text => Box::new(TextReporter::new(out)),
        Format::Csv => Box::new(CsvReporter::new(out)),
    };
    let mut reporter = EveryNth::new(inner, args.every);

    let e0 = sim.total_energy();
    reporter.begin(&sim)?;

    let mut io_result = Ok(());
    let run_result = sim.run_with(|s| {
        if io_result.is_ok() {
            io_result = reporter.report(s);
        }
    });
    reporter.finish(&sim)?;
    io_result.context("failed to write report")?;

    if let Err(e) = &run_result {
        error!("simulation stopped at t = {} after {} steps: {e}", sim.current_time(), sim.steps());
    }
    run_result?;

    let e1 = sim.total_energy();
    info!(
        "finished {} steps, t = {}, relative energy error {:.3e}",
        sim.steps(),
        sim.current_time(),
        ((e1 - e0) / e0).abs(),
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_step()?;
        return Ok(());
    }

    let scenario_cfg = match &args.file {
        Some(path) => load_scenario_from_yaml(path)?,
        None => sun_earth(),
    };
    info!("loaded scenario with {} bodies", scenario_cfg.bodies.len());

    run_scenario(scenario_cfg, &args)
}
