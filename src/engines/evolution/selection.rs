use crate::error::{ensure_finite, Result};
use crate::types::{mean_of, Individual};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt::Debug;

/// Scores an individual; the orchestrator writes the score to `fitness`.
pub trait SelectionModel: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn fitness(&self, individual: &Individual) -> f64;

    /// One score per row of an individuals x genes matrix.
    fn fitness_batch(&self, expression: ArrayView2<f64>) -> Array1<f64>;
}

fn row_mean(row: ArrayView1<f64>) -> f64 {
    mean_of(row.iter().copied(), row.len())
}

/// Fitness is the mean expression level (0 for an individual without genes).
#[derive(Debug, Clone, Default)]
pub struct ProportionalSelection;

impl ProportionalSelection {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionModel for ProportionalSelection {
    fn name(&self) -> &str {
        "proportional"
    }

    fn fitness(&self, individual: &Individual) -> f64 {
        individual.mean_expression()
    }

    fn fitness_batch(&self, expression: ArrayView2<f64>) -> Array1<f64> {
        expression.rows().into_iter().map(row_mean).collect()
    }
}

/// Fitness is 1 when mean expression exceeds `threshold`, otherwise 0.
#[derive(Debug, Clone)]
pub struct ThresholdSelection {
    threshold: f64,
}

impl ThresholdSelection {
    pub fn new(threshold: f64) -> Result<Self> {
        ensure_finite("selection threshold", threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, mean_expression: f64) -> f64 {
        if mean_expression > self.threshold {
            1.0
        } else {
            0.0
        }
    }
}

impl SelectionModel for ThresholdSelection {
    fn name(&self) -> &str {
        "threshold"
    }

    fn fitness(&self, individual: &Individual) -> f64 {
        self.score(individual.mean_expression())
    }

    fn fitness_batch(&self, expression: ArrayView2<f64>) -> Array1<f64> {
        expression
            .rows()
            .into_iter()
            .map(|row| self.score(row_mean(row)))
            .collect()
    }
}
