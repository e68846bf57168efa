use super::traits::ConfigSection;
use crate::error::{GeneSimError, Result};
use crate::types::Individual;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub size: usize,
    pub gene_names: Vec<String>,
    pub initial_expression: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 100,
            gene_names: vec!["g1".to_string(), "g2".to_string(), "g3".to_string()],
            initial_expression: 0.5,
        }
    }
}

impl PopulationConfig {
    pub fn build_individuals(&self) -> Vec<Individual> {
        (0..self.size)
            .map(|_| Individual::with_gene_names(&self.gene_names, self.initial_expression))
            .collect()
    }
}

impl ConfigSection for PopulationConfig {
    fn section_name() -> &'static str {
        "population"
    }

    fn validate(&self) -> Result<()> {
        if !self.initial_expression.is_finite() || self.initial_expression < 0.0 {
            return Err(GeneSimError::Configuration(
                "Initial expression must be a finite, non-negative number".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.gene_names {
            if !seen.insert(name.as_str()) {
                return Err(GeneSimError::Configuration(format!(
                    "Duplicate gene name '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_individuals() {
        let config = PopulationConfig {
            size: 4,
            gene_names: vec!["a".to_string(), "b".to_string()],
            initial_expression: 0.25,
        };
        let individuals = config.build_individuals();
        assert_eq!(individuals.len(), 4);
        assert!(individuals.iter().all(|i| i.expression_levels() == vec![0.25, 0.25]));
    }

    #[test]
    fn test_duplicate_gene_names_rejected() {
        let config = PopulationConfig {
            size: 1,
            gene_names: vec!["a".to_string(), "a".to_string()],
            initial_expression: 0.0,
        };
        assert!(config.validate().is_err());
    }
}
