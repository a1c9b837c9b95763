#![deny(warnings)]

//! Headless evaluator: one decision in, one result record out as JSON.
//!
//! Example:
//!   cli --level 1 --labor 25
//!   cli --level 5 --labor 20 --plant S --player alice
//!   cli --level 2 --labor 10 --capital 10 --config market.yaml

use anyhow::{bail, Context, Result};
use sim_core::{Decision, Level, PlantSize, PlayerId, SessionId, Submission};
use sim_engine::MarketConfig;
use tracing::{info, Level as LogLevel};
use tracing_subscriber::EnvFilter;

struct Args {
    level: u8,
    labor: f64,
    capital: Option<f64>,
    plant: Option<String>,
    player: String,
    session: String,
    config: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut level: Option<u8> = None;
    let mut labor: Option<f64> = None;
    let mut capital: Option<f64> = None;
    let mut plant: Option<String> = None;
    let mut player = "student".to_string();
    let mut session = "default".to_string();
    let mut config: Option<String> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--level" => level = it.next().and_then(|s| s.parse().ok()),
            "--labor" => labor = it.next().and_then(|s| s.parse().ok()),
            "--capital" => capital = it.next().and_then(|s| s.parse().ok()),
            "--plant" => plant = it.next(),
            "--player" => {
                if let Some(p) = it.next() {
                    player = p;
                }
            }
            "--session" => {
                if let Some(s) = it.next() {
                    session = s;
                }
            }
            "--config" => config = it.next(),
            _ => {}
        }
    }

    let Some(level) = level else {
        bail!("--level is required (1-5)")
    };
    let Some(labor) = labor else {
        bail!("--labor is required")
    };
    Ok(Args {
        level,
        labor,
        capital,
        plant,
        player,
        session,
        config,
    })
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(LogLevel::INFO)
        .init();

    let args = parse_args()?;
    info!(git_sha = env!("GIT_SHA"), "starting evaluator");

    let level = Level::from_number(args.level)
        .with_context(|| format!("unknown level: {}", args.level))?;
    let plant_size = match &args.plant {
        Some(code) => Some(
            PlantSize::from_code(code).with_context(|| format!("unknown plant size: {code}"))?,
        ),
        None => None,
    };
    let config = match &args.config {
        Some(path) => MarketConfig::from_yaml_file(path)
            .with_context(|| format!("loading market config from {path}"))?,
        None => MarketConfig::default(),
    };

    let submission = Submission {
        player: PlayerId(args.player),
        session: SessionId(args.session),
        level,
        decision: Decision {
            labor: args.labor,
            capital: args.capital,
            plant_size,
        },
    };
    let result = sim_engine::evaluate(&submission, config.params(level))?;

    println!(
        "Level {} | output: {:.2} | cost: {:.2} | revenue: {:.2} | profit: {:.2}",
        result.level.number(),
        result.output,
        result.total_cost,
        result.total_revenue,
        result.profit
    );
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
