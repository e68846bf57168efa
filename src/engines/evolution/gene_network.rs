use crate::engines::evolution::{MutationModel, SelectionModel};
use crate::engines::expression::ExpressionModel;
use crate::engines::network::RegulatoryNetwork;
use crate::error::{GeneSimError, Result};
use crate::types::{clamp_level, mean_of, Conditions, Individual};
use ndarray::{Array2, ArrayViewMut2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Receives the orchestrator after every completed generation.
pub trait GenerationObserver {
    fn on_generation_complete(&mut self, model: &GeneNetwork);
}

/// Owns the population and advances it one generation per `step`.
///
/// Each step runs three phases over the whole population: expression
/// (optionally coupled through the regulatory network), selection, then
/// mutation. Regulatory input is always computed from the start-of-step
/// expression levels.
pub struct GeneNetwork {
    individuals: Vec<Individual>,
    gene_names: Vec<String>,
    expression_model: Arc<dyn ExpressionModel>,
    selection_model: Arc<dyn SelectionModel>,
    mutation_model: Arc<dyn MutationModel>,
    conditions: Conditions,
    regulatory_network: Option<Arc<RegulatoryNetwork>>,
    seed: Option<u64>,
    rng: StdRng,
    generation: u64,
    // Population-sized scratch matrices reused by every step.
    levels: Array2<f64>,
    tf_inputs: Array2<f64>,
}

pub struct GeneNetworkBuilder {
    individuals: Vec<Individual>,
    expression_model: Arc<dyn ExpressionModel>,
    selection_model: Arc<dyn SelectionModel>,
    mutation_model: Arc<dyn MutationModel>,
    conditions: Conditions,
    regulatory_network: Option<Arc<RegulatoryNetwork>>,
    seed: Option<u64>,
}

impl GeneNetworkBuilder {
    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn regulatory_network(mut self, network: Arc<RegulatoryNetwork>) -> Self {
        self.regulatory_network = Some(network);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that every individual carries the same genes in the same order
    /// and, with a network attached, that those genes are the network's.
    pub fn build(self) -> Result<GeneNetwork> {
        let gene_names = population_gene_names(&self.individuals)?;

        let gene_names = match &self.regulatory_network {
            Some(network) => {
                if self.individuals.is_empty() {
                    network.gene_names().to_vec()
                } else if gene_names.len() != network.n_genes() {
                    return Err(GeneSimError::Configuration(format!(
                        "regulatory network has {} genes but individuals carry {}",
                        network.n_genes(),
                        gene_names.len()
                    )));
                } else if gene_names.as_slice() != network.gene_names() {
                    return Err(GeneSimError::Configuration(
                        "individual gene order does not match the regulatory network".to_string(),
                    ));
                } else {
                    gene_names
                }
            }
            None => gene_names,
        };

        if self.individuals.is_empty() {
            log::warn!("gene network created with an empty population");
        } else if gene_names.is_empty() {
            log::warn!("individuals carry no genes; fitness will be 0");
        }
        if let Some(network) = &self.regulatory_network {
            if !self.expression_model.is_regulated() {
                log::warn!(
                    "expression model '{}' has no regulatory overlay; network input will be ignored",
                    self.expression_model.name()
                );
            }
            if network.n_interactions() == 0 {
                log::warn!("regulatory network has no interactions");
            }
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "gene network: {} individuals x {} genes, expression={}, selection={}, mutation={}, regulation={}, seed={:?}",
            self.individuals.len(),
            gene_names.len(),
            self.expression_model.name(),
            self.selection_model.name(),
            self.mutation_model.name(),
            self.regulatory_network.is_some(),
            self.seed
        );

        let shape = (self.individuals.len(), gene_names.len());
        let tf_shape = match &self.regulatory_network {
            Some(_) if self.expression_model.is_regulated() => shape,
            _ => (0, 0),
        };

        Ok(GeneNetwork {
            levels: Array2::zeros(shape),
            tf_inputs: Array2::zeros(tf_shape),
            individuals: self.individuals,
            gene_names,
            expression_model: self.expression_model,
            selection_model: self.selection_model,
            mutation_model: self.mutation_model,
            conditions: self.conditions,
            regulatory_network: self.regulatory_network,
            seed: self.seed,
            rng,
            generation: 0,
        })
    }
}

fn population_gene_names(individuals: &[Individual]) -> Result<Vec<String>> {
    let Some(first) = individuals.first() else {
        return Ok(Vec::new());
    };
    let names: Vec<String> = first.gene_names().map(str::to_string).collect();
    for (i, individual) in individuals.iter().enumerate().skip(1) {
        if individual.len() != names.len() {
            return Err(GeneSimError::Configuration(format!(
                "individual {} has {} genes, expected {}",
                i,
                individual.len(),
                names.len()
            )));
        }
        if !individual.gene_names().eq(names.iter().map(String::as_str)) {
            return Err(GeneSimError::Configuration(format!(
                "individual {} has a different gene order",
                i
            )));
        }
    }
    Ok(names)
}

impl GeneNetwork {
    pub fn builder(
        individuals: Vec<Individual>,
        expression_model: Arc<dyn ExpressionModel>,
        selection_model: Arc<dyn SelectionModel>,
        mutation_model: Arc<dyn MutationModel>,
    ) -> GeneNetworkBuilder {
        GeneNetworkBuilder {
            individuals,
            expression_model,
            selection_model,
            mutation_model,
            conditions: Conditions::default(),
            regulatory_network: None,
            seed: None,
        }
    }

    /// Default conditions, no regulation, entropy-seeded.
    pub fn new(
        individuals: Vec<Individual>,
        expression_model: Arc<dyn ExpressionModel>,
        selection_model: Arc<dyn SelectionModel>,
        mutation_model: Arc<dyn MutationModel>,
    ) -> Result<Self> {
        Self::builder(individuals, expression_model, selection_model, mutation_model).build()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    pub fn n_genes(&self) -> usize {
        self.gene_names.len()
    }

    pub fn regulatory_network(&self) -> Option<&Arc<RegulatoryNetwork>> {
        self.regulatory_network.as_ref()
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Takes effect from the next step.
    pub fn set_conditions(&mut self, conditions: Conditions) {
        self.conditions = conditions;
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn expression_model(&self) -> &Arc<dyn ExpressionModel> {
        &self.expression_model
    }

    pub fn mean_fitness(&self) -> f64 {
        mean_of(self.individuals.iter().map(|i| i.fitness), self.individuals.len())
    }

    /// Highest fitness in the population; 0 when it is empty.
    pub fn max_fitness(&self) -> f64 {
        self.individuals
            .iter()
            .map(|i| i.fitness)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Current expression levels, one row per individual.
    pub fn expression_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.individuals.len(), self.n_genes()));
        write_levels(&self.individuals, matrix.view_mut());
        matrix
    }

    /// Advances one generation: expression, selection, mutation.
    pub fn step(&mut self) -> Result<()> {
        match &self.regulatory_network {
            Some(network) if self.expression_model.is_regulated() => {
                // The level buffer holds the start-of-step state until the
                // regulatory input has been computed from it.
                write_levels(&self.individuals, self.levels.view_mut());
                network.compute_tf_inputs_batch_into(self.levels.view(), self.tf_inputs.view_mut())?;
                self.expression_model.compute_batch_into(
                    &self.conditions,
                    self.tf_inputs.view(),
                    self.levels.view_mut(),
                );
            }
            _ => self
                .levels
                .fill(clamp_level(self.expression_model.compute(&self.conditions))),
        }
        self.levels.mapv_inplace(clamp_level);

        let fitness = self.selection_model.fitness_batch(self.levels.view());
        self.mutation_model.mutate_batch(self.levels.view_mut(), &mut self.rng);

        for ((individual, row), score) in self
            .individuals
            .iter_mut()
            .zip(self.levels.rows())
            .zip(fitness.iter())
        {
            for (gene, &level) in individual.genes.iter_mut().zip(row.iter()) {
                gene.set_expression_level(level);
            }
            individual.fitness = *score;
        }

        self.generation += 1;
        log::debug!(
            "generation {} complete, mean fitness {:.4}",
            self.generation,
            self.mean_fitness()
        );
        Ok(())
    }

    pub fn run(&mut self, generations: usize) -> Result<()> {
        for _ in 0..generations {
            self.step()?;
        }
        Ok(())
    }

    /// `run` that hands the orchestrator to `observer` after each step.
    pub fn run_observed<O: GenerationObserver>(
        &mut self,
        generations: usize,
        observer: &mut O,
    ) -> Result<()> {
        for _ in 0..generations {
            self.step()?;
            observer.on_generation_complete(self);
        }
        Ok(())
    }
}

fn write_levels(individuals: &[Individual], mut out: ArrayViewMut2<f64>) {
    for (mut row, individual) in out.rows_mut().into_iter().zip(individuals) {
        for (cell, gene) in row.iter_mut().zip(&individual.genes) {
            *cell = gene.expression_level();
        }
    }
}

/// Logs a summary line every `every` generations.
pub struct LoggingObserver {
    every: u64,
}

impl LoggingObserver {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl GenerationObserver for LoggingObserver {
    fn on_generation_complete(&mut self, model: &GeneNetwork) {
        if model.generation() % self.every == 0 {
            log::info!(
                "Generation {} complete. Mean fitness: {:.4}, best fitness: {:.4}",
                model.generation(),
                model.mean_fitness(),
                model.max_fitness()
            );
        }
    }
}
