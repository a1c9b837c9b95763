#![deny(warnings)]

//! Level evaluation pipelines for the factory simulation.
//!
//! One entry point, [`evaluate`], composes the production, cost, and
//! optimality models into a complete [`LevelResult`] for each of the
//! five levels. Evaluation is pure: no persistence, no duplicate
//! checking; callers hand the result to a store which owns the
//! one-result-per-(player, level) rule.

mod config;

pub use config::{ConfigError, MarketConfig};

use sim_core::{
    InputMixDetails, Level, LevelDetails, LevelResult, MarketParams, OutputRange,
    PlantChoiceDetails, ScaleDetails, ScaleStatus, ShutdownDetails, SingleInputDetails,
    Submission, ValidationError,
};
use sim_econ::production::{self, CobbDouglas};
use sim_econ::{cost, optimality, DomainError};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by [`evaluate`].
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// The submission or parameters are structurally invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The inputs make the underlying math undefined.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Evaluate one submission under the given market parameters.
pub fn evaluate(
    submission: &Submission,
    params: &MarketParams,
) -> Result<LevelResult, EngineError> {
    sim_core::validate_decision(submission.level, &submission.decision)?;
    sim_core::validate_params(submission.level, params)?;

    let result = match submission.level {
        Level::SingleInput => single_input(submission, params)?,
        Level::InputMix => input_mix(submission, params)?,
        Level::ReturnsToScale => returns_to_scale(submission, params)?,
        Level::Shutdown => shutdown(submission, params)?,
        Level::PlantChoice => plant_choice(submission, params)?,
    };
    debug!(
        player = %result.player,
        level = result.level.number(),
        output = result.output,
        profit = result.profit,
        "evaluated decision"
    );
    Ok(result)
}

/// Extract a field that validation has already established is present.
fn require<T: Copy>(
    value: Option<T>,
    level: Level,
    field: &'static str,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(level.number(), field))
}

/// Level 1: single-input production, graded by the `P·MPL = w` rule.
fn single_input(sub: &Submission, params: &MarketParams) -> Result<LevelResult, EngineError> {
    let labor = sub.decision.labor;
    let fixed_capital = require(params.fixed_capital, sub.level, "fixed_capital")?;

    let output = production::sqrt_output(labor)?;
    let mpl = production::sqrt_marginal_product(labor)?;
    let apl = production::sqrt_average_product(labor)?;

    // No capital rental is charged at this level; the wage bill is the
    // whole cost.
    let costs = cost::breakdown(0.0, params.wage_rate * labor, output);
    let marginal_cost = cost::marginal_cost(params.wage_rate, mpl);
    let total_revenue = cost::revenue(output, params.output_price);
    let profit = cost::profit(total_revenue, costs.total_cost);
    let verdict = optimality::labor_verdict(labor, params.output_price, params.wage_rate);

    Ok(LevelResult {
        player: sub.player.clone(),
        session: sub.session.clone(),
        level: sub.level,
        labor,
        output,
        total_cost: costs.total_cost,
        total_revenue,
        profit,
        details: LevelDetails::SingleInput(SingleInputDetails {
            fixed_capital,
            marginal_product_labor: mpl,
            average_product_labor: apl,
            average_variable_cost: costs.average_variable_cost,
            marginal_cost,
            verdict,
        }),
    })
}

/// Level 2: Cobb-Douglas input mix, graded by MRTS against `w/r`.
fn input_mix(sub: &Submission, params: &MarketParams) -> Result<LevelResult, EngineError> {
    let labor = sub.decision.labor;
    let capital = require(sub.decision.capital, sub.level, "capital")?;
    let rental_rate = require(params.rental_rate, sub.level, "rental_rate")?;
    let technology = require(params.technology, sub.level, "technology")?;

    let cd = CobbDouglas::new(technology)?;
    let output = cd.output(labor, capital)?;
    let (mpl, mpk) = cd.marginal_products(labor, capital)?;
    let mrts = mpl / mpk;

    let labor_cost = params.wage_rate * labor;
    let capital_cost = rental_rate * capital;
    // Both inputs are variable here; nothing is fixed.
    let costs = cost::breakdown(0.0, labor_cost + capital_cost, output);
    let total_revenue = cost::revenue(output, params.output_price);
    let profit = cost::profit(total_revenue, costs.total_cost);
    let verdict = optimality::mrts_verdict(mrts, params.wage_rate, rental_rate);

    Ok(LevelResult {
        player: sub.player.clone(),
        session: sub.session.clone(),
        level: sub.level,
        labor,
        output,
        total_cost: costs.total_cost,
        total_revenue,
        profit,
        details: LevelDetails::InputMix(InputMixDetails {
            capital,
            technology,
            marginal_product_labor: mpl,
            marginal_product_capital: mpk,
            mrts,
            input_ratio: capital / labor,
            labor_cost,
            capital_cost,
            average_total_cost: costs.average_total_cost,
            isocost_slope: -(params.wage_rate / rental_rate),
            verdict,
        }),
    })
}

/// Level 3: same production math as level 2, graded descriptively by the
/// returns-to-scale classification.
fn returns_to_scale(sub: &Submission, params: &MarketParams) -> Result<LevelResult, EngineError> {
    let labor = sub.decision.labor;
    let capital = require(sub.decision.capital, sub.level, "capital")?;
    let rental_rate = require(params.rental_rate, sub.level, "rental_rate")?;
    let technology = require(params.technology, sub.level, "technology")?;

    let cd = CobbDouglas::new(technology)?;
    let output = cd.output(labor, capital)?;
    let (mpl, mpk) = cd.marginal_products(labor, capital)?;

    let labor_cost = params.wage_rate * labor;
    let capital_cost = rental_rate * capital;
    let costs = cost::breakdown(0.0, labor_cost + capital_cost, output);
    let total_revenue = cost::revenue(output, params.output_price);
    let profit = cost::profit(total_revenue, costs.total_cost);
    let scale_type = cd.scale_type();

    Ok(LevelResult {
        player: sub.player.clone(),
        session: sub.session.clone(),
        level: sub.level,
        labor,
        output,
        total_cost: costs.total_cost,
        total_revenue,
        profit,
        details: LevelDetails::ReturnsToScale(ScaleDetails {
            capital,
            technology,
            marginal_product_labor: mpl,
            marginal_product_capital: mpk,
            mrts: mpl / mpk,
            input_ratio: capital / labor,
            labor_cost,
            capital_cost,
            average_total_cost: costs.average_total_cost,
            returns_to_scale: cd.returns_to_scale(),
            scale_type,
            interpretation: scale_type.interpretation().to_string(),
        }),
    })
}

/// Level 4: short-run costs under a fixed capital stock, graded by the
/// shutdown analysis.
fn shutdown(sub: &Submission, params: &MarketParams) -> Result<LevelResult, EngineError> {
    let labor = sub.decision.labor;
    let fixed_capital = require(params.fixed_capital, sub.level, "fixed_capital")?;
    let rental_rate = require(params.rental_rate, sub.level, "rental_rate")?;
    let technology = require(params.technology, sub.level, "technology")?;

    let cd = CobbDouglas::new(technology)?;
    let output = cd.output(labor, fixed_capital)?;
    let (mpl, _) = cd.marginal_products(labor, fixed_capital)?;

    let costs = cost::breakdown(rental_rate * fixed_capital, params.wage_rate * labor, output);
    let marginal_cost = cost::marginal_cost(params.wage_rate, mpl);
    let total_revenue = cost::revenue(output, params.output_price);
    let profit = cost::profit(total_revenue, costs.total_cost);
    let analysis = optimality::shutdown_analysis(
        params.output_price,
        costs.average_variable_cost,
        costs.total_cost,
        total_revenue,
        costs.total_fixed_cost,
    );

    Ok(LevelResult {
        player: sub.player.clone(),
        session: sub.session.clone(),
        level: sub.level,
        labor,
        output,
        total_cost: costs.total_cost,
        total_revenue,
        profit,
        details: LevelDetails::Shutdown(ShutdownDetails {
            fixed_capital,
            technology,
            marginal_product_labor: mpl,
            average_product_labor: output / labor,
            total_fixed_cost: costs.total_fixed_cost,
            total_variable_cost: costs.total_variable_cost,
            average_fixed_cost: costs.average_fixed_cost,
            average_variable_cost: costs.average_variable_cost,
            average_total_cost: costs.average_total_cost,
            marginal_cost,
            shutdown_rule: analysis.shutdown_rule,
            loss_if_operate: analysis.loss_if_operate,
            loss_if_shutdown: analysis.loss_if_shutdown,
            best_decision: analysis.best_decision,
        }),
    })
}

/// Level 5: plant choice graded against the SRAC-minimizing plant at the
/// same labor.
fn plant_choice(sub: &Submission, params: &MarketParams) -> Result<LevelResult, EngineError> {
    let labor = sub.decision.labor;
    let plant = require(sub.decision.plant_size, sub.level, "plant_size")?;
    let technology = require(params.technology, sub.level, "technology")?;

    let cd = CobbDouglas::new(technology)?;
    let spec = plant.spec();
    let output = cd.output(labor, spec.capital)?;
    let variable_cost = params.wage_rate * labor;

    let costs = cost::breakdown(spec.fixed_cost, variable_cost, output);
    let total_revenue = cost::revenue(output, params.output_price);
    let profit = cost::profit(total_revenue, costs.total_cost);

    let sracs = optimality::plant_sracs(&cd, labor, params.wage_rate)?;
    let lrac = optimality::lrac(&sracs);
    let verdict = optimality::plant_verdict(plant, &sracs);

    // Profit had the optimal plant been built at this labor: its own
    // output and revenue under that plant's capital and fixed cost.
    let optimal_spec = verdict.optimal_plant.spec();
    let optimal_output = cd.output(labor, optimal_spec.capital)?;
    let optimal_revenue = cost::revenue(optimal_output, params.output_price);
    let optimal_profit = cost::profit(optimal_revenue, optimal_spec.fixed_cost + variable_cost);

    let srac = costs.average_total_cost;
    let scale_status = if srac > lrac + optimality::SRAC_TIE_TOLERANCE {
        ScaleStatus::NotAtMes
    } else {
        ScaleStatus::AtMes
    };
    let output_range = OutputRange::classify(output);

    Ok(LevelResult {
        player: sub.player.clone(),
        session: sub.session.clone(),
        level: sub.level,
        labor,
        output,
        total_cost: costs.total_cost,
        total_revenue,
        profit,
        details: LevelDetails::PlantChoice(PlantChoiceDetails {
            plant,
            capital: spec.capital,
            technology,
            total_fixed_cost: costs.total_fixed_cost,
            total_variable_cost: costs.total_variable_cost,
            srac,
            srac_small: sracs[0],
            srac_medium: sracs[1],
            srac_large: sracs[2],
            lrac,
            cost_diff: srac - lrac,
            output_range,
            recommended_plant: output_range.recommended_plant(),
            mes_range: OutputRange::for_plant(verdict.optimal_plant),
            scale_status,
            optimal_profit,
            profit_lost: optimal_profit - profit,
            verdict,
        }),
    })
}
