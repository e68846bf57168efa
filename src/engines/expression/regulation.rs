use crate::error::{ensure_finite, Result};
use crate::types::clamp_level;
use std::fmt::Debug;

/// Folds regulatory input into a base expression level.
pub trait RegulatoryModel: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn compute(&self, base_expr: f64, tf_input: f64) -> f64;
}

/// `max(0, base + weight * tf)`
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveRegulation {
    weight: f64,
}

impl AdditiveRegulation {
    pub fn new(weight: f64) -> Result<Self> {
        ensure_finite("additive regulation weight", weight)?;
        Ok(Self { weight })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl RegulatoryModel for AdditiveRegulation {
    fn name(&self) -> &str {
        "additive"
    }

    fn compute(&self, base_expr: f64, tf_input: f64) -> f64 {
        clamp_level(base_expr + self.weight * tf_input)
    }
}

/// `max(0, base * (1 + weight * tf))`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplicativeRegulation {
    weight: f64,
}

impl MultiplicativeRegulation {
    pub fn new(weight: f64) -> Result<Self> {
        ensure_finite("multiplicative regulation weight", weight)?;
        Ok(Self { weight })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl RegulatoryModel for MultiplicativeRegulation {
    fn name(&self) -> &str {
        "multiplicative"
    }

    fn compute(&self, base_expr: f64, tf_input: f64) -> f64 {
        clamp_level(base_expr * (1.0 + self.weight * tf_input))
    }
}
