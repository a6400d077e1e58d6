use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rehab::scenario::{Scenario, ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "ReHab harvesting ecology runner")]
struct Cli {
    /// Path to a scenario YAML file (the reference board when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the number of rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Override the number of steps in each round
    #[arg(long)]
    steps_per_round: Option<usize>,

    /// Override the placement seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print every tick report as a JSON line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::reference(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&scenario.logging.level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut session_config = scenario.session;
    if let Some(rounds) = cli.rounds {
        session_config.rounds = rounds;
    }
    if let Some(steps) = cli.steps_per_round {
        session_config.steps_per_round = steps;
    }
    session_config.validate()?;
    let seed = cli.seed.unwrap_or(scenario.seed);

    let mut model = scenario.build_model()?;
    let mut session = scenario.session_builder(session_config, seed).build();
    info!(
        scenario = %scenario.name,
        rows = model.rows(),
        columns = model.columns(),
        families = model.families().len(),
        rounds = session_config.rounds,
        steps_per_round = session_config.steps_per_round,
        total_steps = session_config.total_steps(),
        seed,
        "session starting"
    );

    let json = cli.json;
    let summary = session.run_with_hook(&mut model, |report| {
        if json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!(%err, "failed to encode tick report"),
            }
        }
    })?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "Scenario '{}' completed after {} ticks. Biomass left: {}, birds: {}",
            summary.scenario, summary.ticks, summary.final_biomass, summary.final_birds
        );
        for (family, score) in summary.scores.iter().enumerate() {
            println!("  family {family}: {score}");
        }
    }
    Ok(())
}
