use super::{
    evolution::{MutationConfig, SelectionConfig},
    expression::ExpressionConfig,
    network::NetworkConfig,
    population::PopulationConfig,
    traits::ConfigSection,
};
use crate::engines::collector::{reporters, DataCollector};
use crate::engines::evolution::GeneNetwork;
use crate::error::{GeneSimError, Result};
use crate::types::Conditions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub generations: usize,
    pub seed: Option<u64>,
    pub max_history: Option<usize>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            generations: 100,
            seed: None,
            max_history: None,
        }
    }
}

impl ConfigSection for SimulationSettings {
    fn section_name() -> &'static str {
        "simulation"
    }

    fn validate(&self) -> Result<()> {
        if self.max_history == Some(0) {
            return Err(GeneSimError::Configuration(
                "max_history must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(default)]
    pub expression: ExpressionConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.population.validate()?;
        self.expression.validate()?;
        self.selection.validate()?;
        self.mutation.validate()?;
        if let Some(network) = &self.network {
            network.validate()?;
            network.build(&self.population.gene_names)?;
        }
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Orchestrator with the configured population, models, network and seed.
    pub fn build_gene_network(&self) -> Result<GeneNetwork> {
        self.validate()?;
        let mut builder = GeneNetwork::builder(
            self.population.build_individuals(),
            self.expression.build()?,
            self.selection.build()?,
            self.mutation.build()?,
        )
        .conditions(self.conditions.clone())
        .maybe_seed(self.simulation.seed);

        if let Some(network) = &self.network {
            builder = builder.regulatory_network(Arc::new(network.build(&self.population.gene_names)?));
        }
        builder.build()
    }

    /// Collector with the stock reporters, bounded by `max_history`.
    pub fn build_collector(&self) -> DataCollector {
        DataCollector::new(self.simulation.max_history)
            .with_model_reporter("mean_fitness", reporters::mean_fitness)
            .with_model_reporter("max_fitness", reporters::max_fitness)
            .with_model_reporter("mean_expression", reporters::mean_expression)
            .with_individual_reporter("fitness", reporters::fitness)
            .with_individual_reporter("mean_expression", reporters::individual_mean_expression)
            .with_gene_reporter("expression_level", reporters::expression_level)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<SimulationConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(SimulationConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)?;
        let config = SimulationConfig::from_toml_str(&contents)?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = self.get().to_toml_string()?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> SimulationConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Applies `f` and keeps the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SimulationConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}
