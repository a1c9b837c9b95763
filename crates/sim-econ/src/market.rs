//! Round market clearing for the single-input level: aggregate labor
//! demand moves the wage, aggregate output moves the price, and every
//! player settles at the cleared rates.

use crate::{production, DomainError};
use serde::{Deserialize, Serialize};
use sim_core::PlayerId;

/// The cleared price never falls below this floor.
pub const PRICE_FLOOR: f64 = 5_000.0;

/// Labor at or above this multiple of the round average counts as
/// aggressive; at or below the mirror multiple as conservative.
const AGGRESSIVE_FACTOR: f64 = 1.2;
const CONSERVATIVE_FACTOR: f64 = 0.8;

/// Market configuration for one round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Workers available before wages start rising.
    pub labor_pool: f64,
    pub base_wage: f64,
    /// Wage response to labor shortage.
    pub wage_elasticity: f64,
    pub base_price: f64,
    /// Price response to aggregate output.
    pub price_sensitivity: f64,
}

/// One player's labor decision entering the round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundDecision {
    pub player: PlayerId,
    pub labor: f64,
}

/// Cleared market state for a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub total_labor: f64,
    pub market_wage: f64,
    pub total_output: f64,
    pub market_price: f64,
}

/// How a player's labor compares to the round average.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Aggressive,
    Moderate,
    Conservative,
}

/// One player's outcome after the round clears.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub player: PlayerId,
    pub labor: f64,
    pub output: f64,
    pub wage_paid: f64,
    pub price_received: f64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    /// Share of round output, in percent.
    pub market_share: f64,
    pub strategy: Strategy,
}

/// Wage after the round's labor demand lands on the pool: a shortage
/// pushes the wage up proportionally, slack leaves it at the base.
pub fn market_wage(total_labor: f64, config: &RoundConfig) -> f64 {
    let shortage = (total_labor - config.labor_pool).max(0.0);
    config.base_wage * (1.0 + (shortage / config.labor_pool) * config.wage_elasticity)
}

/// Price after aggregate output hits the demand curve, floored.
pub fn market_price(total_output: f64, config: &RoundConfig) -> f64 {
    (config.base_price - total_output * config.price_sensitivity).max(PRICE_FLOOR)
}

/// Clear one round: compute the market wage and price from aggregates,
/// then settle every player at those rates and classify their strategy.
pub fn clear_round(
    config: &RoundConfig,
    decisions: &[RoundDecision],
) -> Result<(MarketSnapshot, Vec<RoundOutcome>), DomainError> {
    if decisions.is_empty() {
        return Err(DomainError::EmptyRound);
    }

    let mut total_labor = 0.0;
    let mut total_output = 0.0;
    let mut outputs = Vec::with_capacity(decisions.len());
    for decision in decisions {
        let output = production::sqrt_output(decision.labor)?;
        total_labor += decision.labor;
        total_output += output;
        outputs.push(output);
    }

    let wage = market_wage(total_labor, config);
    let price = market_price(total_output, config);
    let average_labor = total_labor / decisions.len() as f64;

    let outcomes = decisions
        .iter()
        .zip(outputs)
        .map(|(decision, output)| {
            let revenue = output * price;
            let cost = decision.labor * wage;
            let strategy = if decision.labor >= average_labor * AGGRESSIVE_FACTOR {
                Strategy::Aggressive
            } else if decision.labor <= average_labor * CONSERVATIVE_FACTOR {
                Strategy::Conservative
            } else {
                Strategy::Moderate
            };
            RoundOutcome {
                player: decision.player.clone(),
                labor: decision.labor,
                output,
                wage_paid: wage,
                price_received: price,
                revenue,
                cost,
                profit: revenue - cost,
                market_share: output / total_output * 100.0,
                strategy,
            }
        })
        .collect();

    let snapshot = MarketSnapshot {
        total_labor,
        market_wage: wage,
        total_output,
        market_price: price,
    };
    Ok((snapshot, outcomes))
}
