use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name for the ambient transcription factor concentration.
pub const TF_CONCENTRATION: &str = "tf_concentration";

/// A named gene with a non-negative expression level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    name: String,
    expression_level: f64,
}

impl Gene {
    pub fn new(name: impl Into<String>, expression_level: f64) -> Self {
        Self {
            name: name.into(),
            expression_level: clamp_level(expression_level),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression_level(&self) -> f64 {
        self.expression_level
    }

    /// Every write is clamped to `>= 0`; NaN collapses to 0.
    pub fn set_expression_level(&mut self, level: f64) {
        self.expression_level = clamp_level(level);
    }
}

pub(crate) fn clamp_level(level: f64) -> f64 {
    if level > 0.0 {
        level
    } else {
        0.0
    }
}

/// Ordered genes plus the fitness assigned by the last selection phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genes: Vec<Gene>,
    pub fitness: f64,
}

impl Individual {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes, fitness: 1.0 }
    }

    /// One gene per name, all starting at `initial_level`.
    pub fn with_gene_names<S: AsRef<str>>(gene_names: &[S], initial_level: f64) -> Self {
        Self::new(
            gene_names
                .iter()
                .map(|name| Gene::new(name.as_ref(), initial_level))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.name() == name)
    }

    pub fn gene_names(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(|g| g.name())
    }

    pub fn expression_levels(&self) -> Vec<f64> {
        self.genes.iter().map(|g| g.expression_level()).collect()
    }

    /// Mean expression across genes; 0 for an individual without genes.
    pub fn mean_expression(&self) -> f64 {
        mean_of(self.genes.iter().map(|g| g.expression_level()), self.genes.len())
    }
}

pub(crate) fn mean_of(values: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

/// Environment snapshot handed to expression models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions {
    fields: BTreeMap<String, f64>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_tf_concentration(self, value: f64) -> Self {
        self.with(TF_CONCENTRATION, value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    pub fn tf_concentration(&self) -> f64 {
        self.get(TF_CONCENTRATION).unwrap_or(0.0)
    }

    pub fn fields(&self) -> &BTreeMap<String, f64> {
        &self.fields
    }
}

impl From<BTreeMap<String, f64>> for Conditions {
    fn from(fields: BTreeMap<String, f64>) -> Self {
        Self { fields }
    }
}
