use super::traits::ConfigSection;
use crate::engines::evolution::{
    MutationModel, PointMutation, ProportionalSelection, SelectionModel, ThresholdSelection,
};
use crate::error::{GeneSimError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionConfig {
    #[default]
    Proportional,
    Threshold { threshold: f64 },
}

impl SelectionConfig {
    pub fn build(&self) -> Result<Arc<dyn SelectionModel>> {
        Ok(match self {
            SelectionConfig::Proportional => Arc::new(ProportionalSelection::new()),
            SelectionConfig::Threshold { threshold } => Arc::new(ThresholdSelection::new(*threshold)?),
        })
    }
}

impl ConfigSection for SelectionConfig {
    fn section_name() -> &'static str {
        "selection"
    }

    fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    pub rate: f64,
    pub magnitude: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            rate: 0.01,
            magnitude: 0.1,
        }
    }
}

impl MutationConfig {
    pub fn build(&self) -> Result<Arc<dyn MutationModel>> {
        Ok(Arc::new(PointMutation::new(self.rate, self.magnitude)?))
    }
}

impl ConfigSection for MutationConfig {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rate) {
            return Err(GeneSimError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(GeneSimError::Configuration(
                "Mutation magnitude must be a finite, non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
