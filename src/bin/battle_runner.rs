//! Headless Battle Runner
//!
//! Loads a scenario, runs it to conclusion and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fleet_battle::battle::{run_with_observer, CancelToken, RunOutcome, Scenario};
use fleet_battle::core::error::Result;
use fleet_battle::core::types::Side;

/// Headless Battle Runner - aggregate fleet battles from a scenario file
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a fleet battle scenario and print the outcome")]
struct Args {
    /// Scenario TOML file
    #[arg(long, default_value = "data/scenarios/skirmish.toml")]
    scenario: PathBuf,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Override the scenario's tick cap
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Override the volley seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print every tick report to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut scenario = Scenario::load(&args.scenario)?;
    if let Some(max_ticks) = args.max_ticks {
        scenario.tick_cap = Some(max_ticks);
    }
    if let Some(seed) = args.seed {
        scenario.config.seed = seed;
    }

    let mut battle = scenario.build()?;
    tracing::info!(
        attackers = battle.total_alive(Side::Attacker),
        defenders = battle.total_alive(Side::Defender),
        tick_cap = battle.tick_cap(),
        "battle starting"
    );

    let verbose = args.verbose;
    let outcome = run_with_observer(&mut battle, &CancelToken::new(), |report| {
        if verbose {
            eprintln!(
                "[{}] attackers {} (-{}) defenders {} (-{}) damage {:.1} / {:.1}",
                report.tick,
                report.attackers.units_alive,
                report.attackers.units_lost,
                report.defenders.units_alive,
                report.defenders.units_lost,
                report.attackers.damage_dealt,
                report.defenders.damage_dealt,
            );
            for event in &report.events {
                eprintln!("  [{}] {:?}: {}", event.tick, event.event_type, event.description);
            }
        }
    })?;

    let RunOutcome::Concluded(result) = outcome else {
        tracing::warn!("battle did not conclude");
        return Ok(());
    };

    match args.format.as_str() {
        "text" => {
            println!("Battle Result");
            println!("=============");
            println!("{}", result.summary());
            for (label, fleets) in [("Attackers", &result.attackers), ("Defenders", &result.defenders)] {
                for fleet in fleets {
                    println!("{} / {}: {} ships", label, fleet.name, fleet.alive);
                    for chunk in &fleet.chunks {
                        println!(
                            "  {} x{} (pool {:.1})",
                            chunk.design_name, chunk.alive, chunk.defence_pool
                        );
                    }
                }
            }
        }
        "json" => println!("{}", result.to_json()?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", result.to_json()?);
        }
    }

    Ok(())
}
