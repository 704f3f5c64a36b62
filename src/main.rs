use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gardensim::{
    engine::{Engine, EngineBuilder, EngineSettings},
    events::{EventSink, TextLogSink, TracingSink},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Garden simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/reference.yaml")]
    scenario: PathBuf,

    /// Override day count (uses scenario default when omitted)
    #[arg(long)]
    days: Option<u64>,

    /// Override the forecast seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter, e.g. `debug` or `gardensim=trace`. RUST_LOG wins when set.
    #[arg(long)]
    log_level: Option<String>,

    /// Also write the garden log as text lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let sink: Box<dyn EventSink> = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Box::new((TracingSink, TextLogSink::new(BufWriter::new(file))))
        }
        None => Box::new(TracingSink),
    };

    let mut garden = scenario
        .build_garden(sink)
        .with_context(|| format!("Failed to plant garden for '{}'", scenario.name))?;
    let days = scenario.days(cli.days);
    let mut engine = match cli.seed {
        Some(seed) => {
            let mut settings = EngineSettings::from_scenario(&scenario);
            settings.seed = seed;
            EngineBuilder::new(settings)
                .with_script(scenario.events.iter().cloned())
                .build()
        }
        None => Engine::from_scenario(&scenario),
    };

    let reports = engine.run(&mut garden, days);
    let state = garden.state();
    info!(
        scenario = %scenario.name,
        days = state.day,
        alive = state.alive,
        dead = state.dead,
        reports = reports.len(),
        "simulation finished"
    );

    let snapshot = garden.snapshot(&scenario.name);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
