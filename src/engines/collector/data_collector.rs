use crate::engines::evolution::{GeneNetwork, GenerationObserver};
use crate::error::Result;
use crate::types::{Gene, Individual};
use polars::prelude::*;
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::{BTreeMap, VecDeque};

pub type ModelReporter = Box<dyn Fn(&GeneNetwork) -> f64 + Send + Sync>;
pub type IndividualReporter = Box<dyn Fn(&Individual) -> f64 + Send + Sync>;
pub type GeneReporter = Box<dyn Fn(&Gene) -> f64 + Send + Sync>;

/// One reporter value tagged with the generation it was collected at.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub generation: u64,
    pub value: T,
}

/// Records named scalar reports per generation at three levels: the whole
/// model, each individual, and each gene of each individual.
///
/// With `max_history = Some(m)` every reporter keeps only its `m` most
/// recent records.
pub struct DataCollector {
    model_reporters: BTreeMap<String, ModelReporter>,
    individual_reporters: BTreeMap<String, IndividualReporter>,
    gene_reporters: BTreeMap<String, GeneReporter>,
    max_history: Option<usize>,
    model_history: BTreeMap<String, VecDeque<Record<f64>>>,
    individual_history: BTreeMap<String, VecDeque<Record<Vec<f64>>>>,
    gene_history: BTreeMap<String, VecDeque<Record<Vec<Vec<f64>>>>>,
    gene_names: Vec<String>,
}

impl DataCollector {
    pub fn new(max_history: Option<usize>) -> Self {
        Self {
            model_reporters: BTreeMap::new(),
            individual_reporters: BTreeMap::new(),
            gene_reporters: BTreeMap::new(),
            max_history,
            model_history: BTreeMap::new(),
            individual_history: BTreeMap::new(),
            gene_history: BTreeMap::new(),
            gene_names: Vec::new(),
        }
    }

    pub fn with_model_reporter<F>(mut self, name: impl Into<String>, reporter: F) -> Self
    where
        F: Fn(&GeneNetwork) -> f64 + Send + Sync + 'static,
    {
        self.model_reporters.insert(name.into(), Box::new(reporter));
        self
    }

    pub fn with_individual_reporter<F>(mut self, name: impl Into<String>, reporter: F) -> Self
    where
        F: Fn(&Individual) -> f64 + Send + Sync + 'static,
    {
        self.individual_reporters.insert(name.into(), Box::new(reporter));
        self
    }

    pub fn with_gene_reporter<F>(mut self, name: impl Into<String>, reporter: F) -> Self
    where
        F: Fn(&Gene) -> f64 + Send + Sync + 'static,
    {
        self.gene_reporters.insert(name.into(), Box::new(reporter));
        self
    }

    pub fn max_history(&self) -> Option<usize> {
        self.max_history
    }

    /// Evaluates every reporter against the model's current generation.
    pub fn collect(&mut self, model: &GeneNetwork) {
        let generation = model.generation();
        let max_history = self.max_history;

        for (name, reporter) in &self.model_reporters {
            let history = self.model_history.entry(name.clone()).or_default();
            push_bounded(history, Record { generation, value: reporter(model) }, max_history);
        }

        for (name, reporter) in &self.individual_reporters {
            let value: Vec<f64> = per_individual(model.individuals(), |i| reporter(i));
            let history = self.individual_history.entry(name.clone()).or_default();
            push_bounded(history, Record { generation, value }, max_history);
        }

        for (name, reporter) in &self.gene_reporters {
            let value: Vec<Vec<f64>> = per_individual(model.individuals(), |i| {
                i.genes.iter().map(|g| reporter(g)).collect::<Vec<f64>>()
            });
            let history = self.gene_history.entry(name.clone()).or_default();
            push_bounded(history, Record { generation, value }, max_history);
        }

        if !self.gene_reporters.is_empty() {
            self.gene_names = model.gene_names().to_vec();
        }
    }

    pub fn model_history(&self, name: &str) -> Option<&VecDeque<Record<f64>>> {
        self.model_history.get(name)
    }

    pub fn individual_history(&self, name: &str) -> Option<&VecDeque<Record<Vec<f64>>>> {
        self.individual_history.get(name)
    }

    pub fn gene_history(&self, name: &str) -> Option<&VecDeque<Record<Vec<Vec<f64>>>>> {
        self.gene_history.get(name)
    }

    /// One row per collected generation, one column per model reporter.
    pub fn model_vars_dataframe(&self) -> Result<DataFrame> {
        let generations: Vec<u64> = self
            .model_history
            .values()
            .next()
            .map(|h| h.iter().map(|r| r.generation).collect())
            .unwrap_or_default();

        let mut columns = vec![Column::new("generation".into(), generations)];
        for (name, history) in &self.model_history {
            let values: Vec<f64> = history.iter().map(|r| r.value).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// One row per (generation, individual).
    pub fn individual_vars_dataframe(&self) -> Result<DataFrame> {
        let mut generations = Vec::new();
        let mut individuals = Vec::new();
        if let Some(history) = self.individual_history.values().next() {
            for record in history {
                for i in 0..record.value.len() {
                    generations.push(record.generation);
                    individuals.push(i as u64);
                }
            }
        }

        let mut columns = vec![
            Column::new("generation".into(), generations),
            Column::new("individual".into(), individuals),
        ];
        for (name, history) in &self.individual_history {
            let values: Vec<f64> = history.iter().flat_map(|r| r.value.iter().copied()).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// One row per (generation, individual, gene).
    pub fn gene_vars_dataframe(&self) -> Result<DataFrame> {
        let mut generations = Vec::new();
        let mut individuals = Vec::new();
        let mut genes = Vec::new();
        if let Some(history) = self.gene_history.values().next() {
            for record in history {
                for (i, levels) in record.value.iter().enumerate() {
                    for g in 0..levels.len() {
                        generations.push(record.generation);
                        individuals.push(i as u64);
                        genes.push(
                            self.gene_names
                                .get(g)
                                .cloned()
                                .unwrap_or_else(|| g.to_string()),
                        );
                    }
                }
            }
        }

        let mut columns = vec![
            Column::new("generation".into(), generations),
            Column::new("individual".into(), individuals),
            Column::new("gene".into(), genes),
        ];
        for (name, history) in &self.gene_history {
            let values: Vec<f64> = history
                .iter()
                .flat_map(|r| r.value.iter().flat_map(|row| row.iter().copied()))
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

impl GenerationObserver for DataCollector {
    fn on_generation_complete(&mut self, model: &GeneNetwork) {
        self.collect(model);
    }
}

/// Evaluates `f` for every individual, in population order.
#[cfg(feature = "parallel")]
fn per_individual<T, F>(individuals: &[Individual], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Individual) -> T + Send + Sync,
{
    individuals.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn per_individual<T, F>(individuals: &[Individual], f: F) -> Vec<T>
where
    F: Fn(&Individual) -> T,
{
    individuals.iter().map(f).collect()
}

fn push_bounded<T>(history: &mut VecDeque<T>, record: T, max_history: Option<usize>) {
    history.push_back(record);
    if let Some(max) = max_history {
        while history.len() > max {
            history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_bounded_evicts_oldest() {
        let mut history = VecDeque::new();
        for i in 0..5 {
            push_bounded(&mut history, i, Some(3));
        }
        assert_eq!(history, VecDeque::from(vec![2, 3, 4]));
    }

    #[test]
    fn test_per_individual_keeps_population_order() {
        let individuals: Vec<Individual> = (0..64)
            .map(|i| Individual::with_gene_names(&["a"], i as f64))
            .collect();
        let levels = per_individual(&individuals, |i| i.genes[0].expression_level());
        assert_eq!(levels, (0..64).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_push_unbounded() {
        let mut history = VecDeque::new();
        for i in 0..5 {
            push_bounded(&mut history, i, None);
        }
        assert_eq!(history.len(), 5);
    }
}
