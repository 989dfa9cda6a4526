//! atom_sim - Headless driver for the atom production core

mod args;
mod simulation;

use args::SimArgs;
use atom_core::{default_catalog, Catalog, ConfigError, Game, ProductionConfig, SaveData, SaveError};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simulation::{format_breakdown, run_session, SimulationPlan};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

fn main() -> ExitCode {
    let args = SimArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: SimArgs) -> Result<(), SimError> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path)?,
        None => default_catalog(),
    };
    let config = match &args.config {
        Some(path) => ProductionConfig::from_file(path)?,
        None => ProductionConfig::builtin(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(catalog.clone(), config.clone());
    let mut start = 0.0;
    if let Some(path) = args.save.as_deref().filter(|path| path.exists()) {
        let data = SaveData::load(path)?;
        start = data.saved_at;
        game.load(&data, start);
        tracing::info!("Resumed from {}", path.display());
    }

    let plan = SimulationPlan {
        clicks: args.clicks,
        online_secs: args.online_secs,
        auto_buy: args.auto_buy,
        auto_claim: args.auto_claim,
    };
    let summary = run_session(&mut game, &plan, start, &mut rng);

    println!("== Online session ==");
    println!("  time:           {:.0}s", summary.ended_at - start);
    println!("  clicks:         {} ({} critical)", summary.clicks, summary.critical_hits);
    println!("  from clicks:    {}", summary.click_gain);
    println!("  passive:        {}", summary.passive_gain);
    println!("  purchases:      {} (spent {})", summary.purchases, summary.spent);
    println!("  frenzy claims:  {} ({} runs finished)", summary.frenzy_claims, summary.frenzy_runs);

    let mut now = summary.ended_at;
    if args.offline_secs > 0.0 {
        // Leave and come back through a save document
        let data = game.save(now);
        game = Game::new(catalog, config);
        game.load(&data, now);
        now += args.offline_secs;
        let report = game.resume_offline(now);

        println!("== Offline ==");
        println!("  away:           {:.0}s", report.requested_secs);
        println!(
            "  credited:       {:.0}s{}",
            report.applied_secs,
            if report.capped { " (capped)" } else { "" }
        );
        println!("  boosted:        {:.0}s", report.boosted_secs);
        println!("  gained:         {}", report.gained);
    }

    println!("== Production ==");
    for line in format_breakdown(&game) {
        println!("  {}", line);
    }
    println!("== Resources ==");
    let resources = &game.state().resources;
    println!("  atoms:          {}", resources.atoms);
    println!("  lifetime:       {}", resources.lifetime_atoms);

    if let Some(path) = &args.save {
        game.save(now).save(path)?;
        tracing::info!("Saved to {}", path.display());
    }
    Ok(())
}
