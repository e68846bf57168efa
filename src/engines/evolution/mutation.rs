use crate::error::{ensure_finite, GeneSimError, Result};
use crate::types::{clamp_level, Individual};
use ndarray::ArrayViewMut2;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use std::fmt::Debug;

/// Perturbs expression levels using the caller's random stream.
///
/// Both methods must draw from `rng` in gene order, individual by
/// individual, so a batch run reproduces a per-individual run exactly.
pub trait MutationModel: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn mutate(&self, individual: &mut Individual, rng: &mut dyn RngCore);

    /// Mutates every row (individual) of an individuals x genes matrix.
    fn mutate_batch(&self, expression: ArrayViewMut2<f64>, rng: &mut dyn RngCore);
}

/// Each gene mutates with probability `rate` by a draw from N(0, magnitude).
#[derive(Debug, Clone)]
pub struct PointMutation {
    rate: f64,
    magnitude: f64,
    perturbation: Normal<f64>,
}

impl PointMutation {
    pub fn new(rate: f64, magnitude: f64) -> Result<Self> {
        ensure_finite("mutation rate", rate)?;
        ensure_finite("mutation magnitude", magnitude)?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(GeneSimError::Configuration(format!(
                "mutation rate must be between 0 and 1, got {}",
                rate
            )));
        }
        if magnitude < 0.0 {
            return Err(GeneSimError::Configuration(format!(
                "mutation magnitude must be non-negative, got {}",
                magnitude
            )));
        }
        let perturbation = Normal::new(0.0, magnitude).map_err(|e| {
            GeneSimError::Configuration(format!("invalid mutation magnitude {}: {}", magnitude, e))
        })?;
        Ok(Self {
            rate,
            magnitude,
            perturbation,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    fn perturb(&self, level: f64, rng: &mut dyn RngCore) -> f64 {
        if rng.gen::<f64>() < self.rate {
            clamp_level(level + self.perturbation.sample(rng))
        } else {
            level
        }
    }
}

impl MutationModel for PointMutation {
    fn name(&self) -> &str {
        "point"
    }

    fn mutate(&self, individual: &mut Individual, rng: &mut dyn RngCore) {
        for gene in individual.genes.iter_mut() {
            let level = self.perturb(gene.expression_level(), rng);
            gene.set_expression_level(level);
        }
    }

    fn mutate_batch(&self, mut expression: ArrayViewMut2<f64>, rng: &mut dyn RngCore) {
        // Logical iteration order is row-major: individual, then gene.
        for level in expression.iter_mut() {
            *level = self.perturb(*level, rng);
        }
    }
}
