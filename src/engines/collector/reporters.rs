//! Stock reporters for [`DataCollector`](super::DataCollector).

use crate::engines::evolution::GeneNetwork;
use crate::types::{mean_of, Gene, Individual};

pub fn mean_fitness(model: &GeneNetwork) -> f64 {
    model.mean_fitness()
}

pub fn max_fitness(model: &GeneNetwork) -> f64 {
    model.max_fitness()
}

/// Mean expression over every gene of every individual.
pub fn mean_expression(model: &GeneNetwork) -> f64 {
    let total = model.individuals().len() * model.n_genes();
    mean_of(
        model
            .individuals()
            .iter()
            .flat_map(|i| i.genes.iter().map(Gene::expression_level)),
        total,
    )
}

pub fn fitness(individual: &Individual) -> f64 {
    individual.fitness
}

pub fn individual_mean_expression(individual: &Individual) -> f64 {
    individual.mean_expression()
}

pub fn expression_level(gene: &Gene) -> f64 {
    gene.expression_level()
}
