use super::ExpressionModel;
use crate::error::{ensure_finite, GeneSimError, Result};
use crate::types::{clamp_level, Conditions};

/// Fixed expression level regardless of conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantExpression {
    level: f64,
}

impl ConstantExpression {
    pub fn new(level: f64) -> Result<Self> {
        ensure_finite("constant level", level)?;
        Ok(Self { level })
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl ExpressionModel for ConstantExpression {
    fn name(&self) -> &str {
        "constant"
    }

    fn compute(&self, _conditions: &Conditions) -> f64 {
        clamp_level(self.level)
    }
}

/// `slope * tf_concentration + intercept`, clamped at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearExpression {
    slope: f64,
    intercept: f64,
}

impl LinearExpression {
    pub fn new(slope: f64, intercept: f64) -> Result<Self> {
        ensure_finite("linear slope", slope)?;
        ensure_finite("linear intercept", intercept)?;
        Ok(Self { slope, intercept })
    }
}

impl ExpressionModel for LinearExpression {
    fn name(&self) -> &str {
        "linear"
    }

    fn compute(&self, conditions: &Conditions) -> f64 {
        clamp_level(self.slope * conditions.tf_concentration() + self.intercept)
    }
}

/// Cooperative activation `v_max * x^n / (k^n + x^n)` of the ambient
/// transcription factor concentration `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct HillExpression {
    v_max: f64,
    k: f64,
    n: f64,
}

impl HillExpression {
    pub fn new(v_max: f64, k: f64, n: f64) -> Result<Self> {
        ensure_finite("hill v_max", v_max)?;
        ensure_finite("hill k", k)?;
        ensure_finite("hill n", n)?;
        if k <= 0.0 {
            return Err(GeneSimError::Configuration(format!(
                "hill constant k must be positive, got {}",
                k
            )));
        }
        if n <= 0.0 {
            return Err(GeneSimError::Configuration(format!(
                "hill coefficient n must be positive, got {}",
                n
            )));
        }
        Ok(Self { v_max, k, n })
    }
}

impl ExpressionModel for HillExpression {
    fn name(&self) -> &str {
        "hill"
    }

    fn compute(&self, conditions: &Conditions) -> f64 {
        let x = conditions.tf_concentration();
        if x <= 0.0 {
            return 0.0;
        }
        // Equivalent to x^n / (k^n + x^n) without overflowing for large n.
        let ratio = (self.k / x).powf(self.n);
        clamp_level(self.v_max / (1.0 + ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_constant_ignores_conditions() {
        let model = ConstantExpression::new(0.4).unwrap();
        assert_eq!(model.compute(&Conditions::new()), 0.4);
        assert_eq!(model.compute(&Conditions::new().with_tf_concentration(9.0)), 0.4);
    }

    #[test]
    fn test_linear_clamps_negative() {
        let model = LinearExpression::new(2.0, 0.5).unwrap();
        let conditions = Conditions::new().with_tf_concentration(1.5);
        assert!(approx_eq(model.compute(&conditions), 3.5));

        let falling = LinearExpression::new(-1.0, 0.2).unwrap();
        assert_eq!(falling.compute(&conditions), 0.0);
    }

    #[test]
    fn test_hill_half_max_at_k() {
        let model = HillExpression::new(2.0, 0.5, 3.0).unwrap();
        let conditions = Conditions::new().with_tf_concentration(0.5);
        assert!(approx_eq(model.compute(&conditions), 1.0));
    }

    #[test]
    fn test_hill_zero_input() {
        let model = HillExpression::new(1.0, 1.0, 2.0).unwrap();
        assert_eq!(model.compute(&Conditions::new()), 0.0);
    }

    #[test]
    fn test_hill_matches_closed_form() {
        let model = HillExpression::new(1.5, 2.0, 2.0).unwrap();
        let x: f64 = 3.0;
        let expected = 1.5 * x.powi(2) / (2.0_f64.powi(2) + x.powi(2));
        let conditions = Conditions::new().with_tf_concentration(x);
        assert!(approx_eq(model.compute(&conditions), expected));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            HillExpression::new(1.0, 0.0, 2.0),
            Err(GeneSimError::Configuration(_))
        ));
        assert!(HillExpression::new(1.0, -1.0, 2.0).is_err());
        assert!(HillExpression::new(f64::NAN, 1.0, 2.0).is_err());
        assert!(LinearExpression::new(f64::INFINITY, 0.0).is_err());
        assert!(ConstantExpression::new(f64::NAN).is_err());
    }
}
