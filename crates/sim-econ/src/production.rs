//! Production functions: the single-input square-root family and the
//! two-input Cobb-Douglas family shared by levels 2-5.

use crate::DomainError;
use sim_core::{CobbDouglasTech, ScaleType};

/// Band around `α + β = 1` treated as constant returns to scale.
pub const CRS_TOLERANCE: f64 = 1e-9;

fn check_labor(labor: f64) -> Result<(), DomainError> {
    if labor.is_finite() && labor > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositiveLabor(labor))
    }
}

fn check_capital(capital: f64) -> Result<(), DomainError> {
    if capital.is_finite() && capital > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositiveCapital(capital))
    }
}

/// Output of the single-input technology, `Q = 10·√L`.
///
/// Capital is exogenously fixed at this level and does not enter the
/// function.
pub fn sqrt_output(labor: f64) -> Result<f64, DomainError> {
    check_labor(labor)?;
    Ok(10.0 * labor.sqrt())
}

/// Marginal product of labor for the square-root technology, `5/√L`.
///
/// Diverges as labor approaches zero, which is why `L > 0` is required.
pub fn sqrt_marginal_product(labor: f64) -> Result<f64, DomainError> {
    check_labor(labor)?;
    Ok(5.0 / labor.sqrt())
}

/// Average product of labor for the square-root technology, `10/√L`.
pub fn sqrt_average_product(labor: f64) -> Result<f64, DomainError> {
    check_labor(labor)?;
    Ok(10.0 / labor.sqrt())
}

/// A validated Cobb-Douglas technology, `Q = A·L^α·K^β`.
///
/// Every level that uses this family goes through the same instance;
/// level pipelines only differ in where `K` comes from (chosen, fixed,
/// or implied by a plant).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CobbDouglas {
    tech: CobbDouglasTech,
}

impl CobbDouglas {
    /// Validate and wrap the technology constants.
    pub fn new(tech: CobbDouglasTech) -> Result<Self, DomainError> {
        for (name, value) in [("A", tech.a), ("alpha", tech.alpha), ("beta", tech.beta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::InvalidTechnology(name));
            }
        }
        Ok(Self { tech })
    }

    /// The wrapped constants.
    pub fn tech(&self) -> CobbDouglasTech {
        self.tech
    }

    fn check_inputs(labor: f64, capital: f64) -> Result<(), DomainError> {
        check_labor(labor)?;
        check_capital(capital)
    }

    /// Output `A·L^α·K^β`.
    pub fn output(&self, labor: f64, capital: f64) -> Result<f64, DomainError> {
        Self::check_inputs(labor, capital)?;
        let t = self.tech;
        Ok(t.a * labor.powf(t.alpha) * capital.powf(t.beta))
    }

    /// Marginal products `(MPL, MPK)`.
    pub fn marginal_products(&self, labor: f64, capital: f64) -> Result<(f64, f64), DomainError> {
        Self::check_inputs(labor, capital)?;
        let t = self.tech;
        let mpl = t.a * t.alpha * labor.powf(t.alpha - 1.0) * capital.powf(t.beta);
        let mpk = t.a * t.beta * labor.powf(t.alpha) * capital.powf(t.beta - 1.0);
        Ok((mpl, mpk))
    }

    /// Marginal rate of technical substitution, `MPL/MPK`.
    pub fn mrts(&self, labor: f64, capital: f64) -> Result<f64, DomainError> {
        let (mpl, mpk) = self.marginal_products(labor, capital)?;
        Ok(mpl / mpk)
    }

    /// Degree of homogeneity, `α + β`.
    pub fn returns_to_scale(&self) -> f64 {
        self.tech.alpha + self.tech.beta
    }

    /// Classify returns to scale. CRS uses a tolerance band so float
    /// rounding cannot misreport an exactly-constant technology.
    pub fn scale_type(&self) -> ScaleType {
        let rts = self.returns_to_scale();
        if (rts - 1.0).abs() < CRS_TOLERANCE {
            ScaleType::Crs
        } else if rts > 1.0 {
            ScaleType::Irs
        } else {
            ScaleType::Drs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cd(a: f64, alpha: f64, beta: f64) -> CobbDouglas {
        CobbDouglas::new(CobbDouglasTech { a, alpha, beta }).unwrap()
    }

    #[test]
    fn sqrt_family_known_values() {
        assert_eq!(sqrt_output(25.0).unwrap(), 50.0);
        assert_eq!(sqrt_marginal_product(25.0).unwrap(), 1.0);
        assert_eq!(sqrt_average_product(25.0).unwrap(), 2.0);
    }

    #[test]
    fn sqrt_family_rejects_non_positive_labor() {
        assert_eq!(sqrt_output(0.0), Err(DomainError::NonPositiveLabor(0.0)));
        assert_eq!(sqrt_output(-3.0), Err(DomainError::NonPositiveLabor(-3.0)));
        assert!(sqrt_marginal_product(0.0).is_err());
        assert!(sqrt_average_product(f64::NAN).is_err());
    }

    #[test]
    fn cobb_douglas_known_values() {
        let f = cd(5.0, 0.5, 0.5);
        assert!((f.output(10.0, 10.0).unwrap() - 50.0).abs() < 1e-12);
        let (mpl, mpk) = f.marginal_products(10.0, 10.0).unwrap();
        assert!((mpl - 2.5).abs() < 1e-12);
        assert!((mpk - 2.5).abs() < 1e-12);
        assert!((f.mrts(10.0, 10.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cobb_douglas_rejects_bad_inputs() {
        let f = cd(5.0, 0.5, 0.5);
        assert_eq!(f.output(0.0, 10.0), Err(DomainError::NonPositiveLabor(0.0)));
        assert_eq!(f.output(10.0, 0.0), Err(DomainError::NonPositiveCapital(0.0)));
        assert!(f.marginal_products(-1.0, 10.0).is_err());
    }

    #[test]
    fn cobb_douglas_rejects_bad_technology() {
        assert_eq!(
            CobbDouglas::new(CobbDouglasTech {
                a: 0.0,
                alpha: 0.5,
                beta: 0.5
            }),
            Err(DomainError::InvalidTechnology("A"))
        );
        assert_eq!(
            CobbDouglas::new(CobbDouglasTech {
                a: 5.0,
                alpha: -0.5,
                beta: 0.5
            }),
            Err(DomainError::InvalidTechnology("alpha"))
        );
        assert_eq!(
            CobbDouglas::new(CobbDouglasTech {
                a: 5.0,
                alpha: 0.5,
                beta: f64::NAN
            }),
            Err(DomainError::InvalidTechnology("beta"))
        );
    }

    #[test]
    fn scale_classification() {
        assert_eq!(cd(5.0, 0.6, 0.6).scale_type(), ScaleType::Irs);
        assert_eq!(cd(5.0, 0.5, 0.5).scale_type(), ScaleType::Crs);
        assert_eq!(cd(10.0, 0.3, 0.3).scale_type(), ScaleType::Drs);
        // Rounding noise inside the band still reads as CRS.
        assert_eq!(cd(5.0, 0.5, 0.5 + 1e-12).scale_type(), ScaleType::Crs);
    }

    proptest! {
        #[test]
        fn sqrt_output_is_strictly_increasing(labor in 0.01f64..10_000.0, step in 0.01f64..100.0) {
            let lo = sqrt_output(labor).unwrap();
            let hi = sqrt_output(labor + step).unwrap();
            prop_assert!(hi > lo);
        }

        #[test]
        fn sqrt_marginal_product_is_strictly_decreasing(labor in 0.01f64..10_000.0, step in 0.01f64..100.0) {
            let early = sqrt_marginal_product(labor).unwrap();
            let late = sqrt_marginal_product(labor + step).unwrap();
            prop_assert!(late < early);
        }

        #[test]
        fn cobb_douglas_is_homogeneous_of_degree_alpha_plus_beta(
            labor in 0.1f64..100.0,
            capital in 0.1f64..100.0,
            t in 0.1f64..10.0,
            alpha in 0.1f64..0.9,
            beta in 0.1f64..0.9,
        ) {
            let f = cd(5.0, alpha, beta);
            let scaled = f.output(t * labor, t * capital).unwrap();
            let expected = t.powf(alpha + beta) * f.output(labor, capital).unwrap();
            prop_assert!((scaled - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }

        #[test]
        fn scale_type_agrees_with_doubling(alpha in 0.1f64..0.9, beta in 0.1f64..0.9) {
            let f = cd(5.0, alpha, beta);
            let base = f.output(10.0, 10.0).unwrap();
            let doubled = f.output(20.0, 20.0).unwrap();
            let ratio = doubled / base;
            match f.scale_type() {
                ScaleType::Irs => prop_assert!(ratio > 2.0),
                ScaleType::Drs => prop_assert!(ratio < 2.0),
                ScaleType::Crs => prop_assert!((ratio - 2.0).abs() < 1e-6),
            }
        }
    }
}
