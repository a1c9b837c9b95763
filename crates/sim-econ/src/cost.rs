//! Cost decomposition shared by every level pipeline.

/// Fixed/variable/total cost with the standard average measures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostBreakdown {
    pub total_fixed_cost: f64,
    pub total_variable_cost: f64,
    pub total_cost: f64,
    /// `TFC/Q`; 0 when nothing is produced.
    pub average_fixed_cost: f64,
    /// `TVC/Q`; 0 when nothing is produced.
    pub average_variable_cost: f64,
    /// `TC/Q`; 0 when nothing is produced.
    pub average_total_cost: f64,
}

/// Decompose cost into the standard averages.
///
/// Averages are defined as 0 at zero output rather than dividing by zero.
pub fn breakdown(total_fixed_cost: f64, total_variable_cost: f64, output: f64) -> CostBreakdown {
    let total_cost = total_fixed_cost + total_variable_cost;
    let (average_fixed_cost, average_variable_cost, average_total_cost) = if output > 0.0 {
        (
            total_fixed_cost / output,
            total_variable_cost / output,
            total_cost / output,
        )
    } else {
        (0.0, 0.0, 0.0)
    };
    CostBreakdown {
        total_fixed_cost,
        total_variable_cost,
        total_cost,
        average_fixed_cost,
        average_variable_cost,
        average_total_cost,
    }
}

/// Marginal cost of one more unit of output, `w / MPL`.
pub fn marginal_cost(wage_rate: f64, marginal_product_labor: f64) -> f64 {
    wage_rate / marginal_product_labor
}

/// Revenue at the market price.
pub fn revenue(output: f64, output_price: f64) -> f64 {
    output * output_price
}

/// Profit over total cost.
pub fn profit(total_revenue: f64, total_cost: f64) -> f64 {
    total_revenue - total_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn averages_are_zero_at_zero_output() {
        let c = breakdown(2_400_000.0, 900_000.0, 0.0);
        assert_eq!(c.total_cost, 3_300_000.0);
        assert_eq!(c.average_fixed_cost, 0.0);
        assert_eq!(c.average_variable_cost, 0.0);
        assert_eq!(c.average_total_cost, 0.0);
    }

    #[test]
    fn short_run_split() {
        let c = breakdown(2_400_000.0, 900_000.0, 100.0);
        assert_eq!(c.average_fixed_cost, 24_000.0);
        assert_eq!(c.average_variable_cost, 9_000.0);
        assert_eq!(c.average_total_cost, 33_000.0);
    }

    proptest! {
        #[test]
        fn cost_identity_holds(
            tfc in 0.0f64..1e8,
            tvc in 0.0f64..1e8,
            output in 0.0f64..1e5,
        ) {
            let c = breakdown(tfc, tvc, output);
            prop_assert!((c.total_cost - (c.total_fixed_cost + c.total_variable_cost)).abs() < 1e-9);
            if output > 0.0 {
                let recomposed = (c.average_fixed_cost + c.average_variable_cost) * output;
                prop_assert!((recomposed - c.total_cost).abs() <= 1e-9 * c.total_cost.max(1.0));
            }
        }

        #[test]
        fn profit_identity_holds(tr in 0.0f64..1e9, tc in 0.0f64..1e9) {
            prop_assert!((profit(tr, tc) - (tr - tc)).abs() < 1e-9);
        }
    }
}
