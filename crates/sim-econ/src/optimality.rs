//! Per-level optimality rules: benchmark computation and verdicts.
//!
//! Each level grades against its own first-order condition, and each
//! comparison keeps its own deliberately distinct tolerance: 5 worker
//! units for the level-1 labor choice, 0.01 for the level-2 MRTS, and a
//! float-rounding band for SRAC ties.

use crate::production::CobbDouglas;
use crate::DomainError;
use sim_core::{
    BestDecision, LaborVerdict, MrtsVerdict, PlantSize, PlantVerdict, ShutdownRule,
};

/// Absolute tolerance (worker units) for the level-1 labor verdict.
pub const LABOR_TOLERANCE: f64 = 5.0;
/// Absolute tolerance for the level-2 MRTS verdict.
pub const MRTS_TOLERANCE: f64 = 0.01;
/// Tolerance for SRAC comparisons when picking the optimal plant; within
/// this band two plants count as tied and the smaller one wins.
pub const SRAC_TIE_TOLERANCE: f64 = 1e-9;

/// Labor solving the value-of-marginal-product condition `P·MPL = w`
/// for the square-root technology: `L* = (5P/w)²`.
pub fn optimal_labor(output_price: f64, wage_rate: f64) -> f64 {
    (5.0 * output_price / wage_rate).powi(2)
}

/// Level-1 verdict with the linear efficiency score.
pub fn labor_verdict(labor: f64, output_price: f64, wage_rate: f64) -> LaborVerdict {
    let optimal = optimal_labor(output_price, wage_rate);
    let deviation = (labor - optimal).abs();
    let is_optimal = deviation < LABOR_TOLERANCE;
    let efficiency_score = if is_optimal {
        100.0
    } else {
        (100.0 - 2.0 * deviation).max(0.0)
    };
    let feedback = if is_optimal {
        "Optimal decision!"
    } else {
        "Consider adjusting labor closer to optimal"
    };
    LaborVerdict {
        optimal_labor: optimal,
        tolerance: LABOR_TOLERANCE,
        is_optimal,
        efficiency_score,
        condition: "P × MP_L = w".to_string(),
        feedback: feedback.to_string(),
    }
}

/// Cost-minimizing MRTS, the input price ratio `w/r`.
pub fn optimal_mrts(wage_rate: f64, rental_rate: f64) -> f64 {
    wage_rate / rental_rate
}

/// Level-2 verdict comparing the achieved MRTS to the price ratio.
pub fn mrts_verdict(mrts: f64, wage_rate: f64, rental_rate: f64) -> MrtsVerdict {
    let optimal = optimal_mrts(wage_rate, rental_rate);
    MrtsVerdict {
        optimal_mrts: optimal,
        tolerance: MRTS_TOLERANCE,
        is_optimal: (mrts - optimal).abs() < MRTS_TOLERANCE,
    }
}

/// Level-4 shutdown analysis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShutdownAnalysis {
    pub shutdown_rule: ShutdownRule,
    pub loss_if_operate: f64,
    pub loss_if_shutdown: f64,
    pub best_decision: BestDecision,
}

/// Compare the textbook price-vs-AVC rule with explicit loss minimization.
///
/// The fixed cost is sunk either way, so the loss-minimizing choice can
/// be to keep operating even when the textbook rule says shut down.
pub fn shutdown_analysis(
    output_price: f64,
    average_variable_cost: f64,
    total_cost: f64,
    total_revenue: f64,
    total_fixed_cost: f64,
) -> ShutdownAnalysis {
    let shutdown_rule = if output_price > average_variable_cost {
        ShutdownRule::Operate
    } else {
        ShutdownRule::Shutdown
    };
    let loss_if_operate = (total_cost - total_revenue).max(0.0);
    let loss_if_shutdown = total_fixed_cost;
    let best_decision = if output_price > average_variable_cost {
        BestDecision::Operate
    } else if loss_if_operate < loss_if_shutdown {
        BestDecision::OperateSmallerLoss
    } else {
        BestDecision::Shutdown
    };
    ShutdownAnalysis {
        shutdown_rule,
        loss_if_operate,
        loss_if_shutdown,
        best_decision,
    }
}

/// Short-run average cost of every plant at the same labor, in
/// `PlantSize::ALL` order. Each plant produces its own output there.
pub fn plant_sracs(
    technology: &CobbDouglas,
    labor: f64,
    wage_rate: f64,
) -> Result<[f64; 3], DomainError> {
    let variable_cost = wage_rate * labor;
    let mut sracs = [0.0; 3];
    for (i, plant) in PlantSize::ALL.iter().enumerate() {
        let spec = plant.spec();
        let output = technology.output(labor, spec.capital)?;
        sracs[i] = (spec.fixed_cost + variable_cost) / output;
    }
    Ok(sracs)
}

/// Long-run average cost: the lower envelope of the three plants.
pub fn lrac(sracs: &[f64; 3]) -> f64 {
    sracs.iter().copied().fold(f64::INFINITY, f64::min)
}

/// The plant attaining the lowest SRAC. Ties resolve toward the smaller
/// plant, and the comparison uses a tolerance so float rounding cannot
/// flip one.
pub fn optimal_plant(sracs: &[f64; 3]) -> PlantSize {
    let mut best = PlantSize::Small;
    let mut best_srac = sracs[0];
    for (i, plant) in PlantSize::ALL.iter().enumerate().skip(1) {
        if sracs[i] < best_srac - SRAC_TIE_TOLERANCE {
            best = *plant;
            best_srac = sracs[i];
        }
    }
    best
}

/// Level-5 verdict for the chosen plant.
pub fn plant_verdict(chosen: PlantSize, sracs: &[f64; 3]) -> PlantVerdict {
    let optimal = optimal_plant(sracs);
    PlantVerdict {
        optimal_plant: optimal,
        is_optimal: chosen == optimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::{self, CobbDouglas};
    use sim_core::CobbDouglasTech;

    #[test]
    fn optimal_labor_solves_the_foc() {
        // At L*, the value of the marginal product equals the wage.
        let price = 20_000.0;
        let wage = 50_000.0;
        let l_star = optimal_labor(price, wage);
        assert_eq!(l_star, 4.0);
        let mpl = production::sqrt_marginal_product(l_star).unwrap();
        assert!((price * mpl - wage).abs() < 1e-6);
    }

    #[test]
    fn labor_verdict_scores_deviation() {
        let at_optimum = labor_verdict(4.0, 20_000.0, 50_000.0);
        assert!(at_optimum.is_optimal);
        assert_eq!(at_optimum.efficiency_score, 100.0);

        let off = labor_verdict(25.0, 20_000.0, 50_000.0);
        assert!(!off.is_optimal);
        assert_eq!(off.efficiency_score, 100.0 - 2.0 * 21.0);

        let far_off = labor_verdict(500.0, 20_000.0, 50_000.0);
        assert_eq!(far_off.efficiency_score, 0.0);
    }

    #[test]
    fn mrts_verdict_uses_the_price_ratio() {
        let v = mrts_verdict(1.0, 50_000.0, 100_000.0);
        assert_eq!(v.optimal_mrts, 0.5);
        assert!(!v.is_optimal);
        assert!(mrts_verdict(0.5005, 50_000.0, 100_000.0).is_optimal);
    }

    #[test]
    fn shutdown_operates_above_avc() {
        let a = shutdown_analysis(25_000.0, 10_000.0, 3_300_000.0, 4_000_000.0, 2_400_000.0);
        assert_eq!(a.shutdown_rule, ShutdownRule::Operate);
        assert_eq!(a.best_decision, BestDecision::Operate);
        assert_eq!(a.loss_if_operate, 0.0);
    }

    #[test]
    fn shutdown_prefers_the_smaller_loss() {
        // Price below AVC, but the operating loss is still smaller than
        // the sunk fixed cost.
        let a = shutdown_analysis(10.0, 12.0, 100.0, 95.0, 20.0);
        assert_eq!(a.shutdown_rule, ShutdownRule::Shutdown);
        assert_eq!(a.best_decision, BestDecision::OperateSmallerLoss);
        assert_eq!(a.loss_if_operate, 5.0);
        assert_eq!(a.loss_if_shutdown, 20.0);
    }

    #[test]
    fn shutdown_when_operating_loses_more_than_fixed_cost() {
        let a = shutdown_analysis(10.0, 12.0, 130.0, 90.0, 20.0);
        assert_eq!(a.shutdown_rule, ShutdownRule::Shutdown);
        assert_eq!(a.best_decision, BestDecision::Shutdown);
    }

    #[test]
    fn plant_sracs_track_each_plants_own_output() {
        let cd = CobbDouglas::new(CobbDouglasTech {
            a: 5.0,
            alpha: 0.5,
            beta: 0.5,
        })
        .unwrap();
        let sracs = plant_sracs(&cd, 20.0, 50_000.0).unwrap();
        // Small: (1e6 + 1e6) / (5·√20·√10)
        let small_output = 5.0 * 20.0f64.sqrt() * 10.0f64.sqrt();
        assert!((sracs[0] - 2_000_000.0 / small_output).abs() < 1e-9);
        assert_eq!(lrac(&sracs), sracs[0]);
        assert_eq!(optimal_plant(&sracs), PlantSize::Small);
    }

    #[test]
    fn plant_tie_breaks_toward_the_smaller_plant() {
        assert_eq!(optimal_plant(&[3.0, 3.0, 3.0]), PlantSize::Small);
        assert_eq!(optimal_plant(&[5.0, 3.0, 3.0]), PlantSize::Medium);
        assert_eq!(optimal_plant(&[5.0, 4.0, 3.0]), PlantSize::Large);
        // A difference inside the tolerance band is still a tie.
        assert_eq!(optimal_plant(&[3.0, 3.0 - 1e-12, 4.0]), PlantSize::Small);
    }

    #[test]
    fn plant_verdict_compares_the_choice() {
        let sracs = [3.0, 2.0, 4.0];
        assert!(plant_verdict(PlantSize::Medium, &sracs).is_optimal);
        let v = plant_verdict(PlantSize::Large, &sracs);
        assert!(!v.is_optimal);
        assert_eq!(v.optimal_plant, PlantSize::Medium);
    }
}
