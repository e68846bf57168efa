use super::traits::ConfigSection;
use crate::engines::network::{RegulationConnection, RegulatoryNetwork};
use crate::error::{ensure_finite, GeneSimError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub detect_circuits: bool,
    #[serde(default)]
    pub interactions: Vec<RegulationConnection>,
}

impl NetworkConfig {
    pub fn build(&self, gene_names: &[String]) -> Result<RegulatoryNetwork> {
        RegulatoryNetwork::new(gene_names.iter().cloned(), &self.interactions, self.detect_circuits)
    }
}

impl ConfigSection for NetworkConfig {
    fn section_name() -> &'static str {
        "network"
    }

    /// Gene references are checked against the population when the whole
    /// configuration is validated.
    fn validate(&self) -> Result<()> {
        for connection in &self.interactions {
            if connection.source == connection.target {
                return Err(GeneSimError::Configuration(format!(
                    "Self-loop on gene '{}'",
                    connection.source
                )));
            }
            ensure_finite("interaction weight", connection.weight)?;
        }
        Ok(())
    }
}
