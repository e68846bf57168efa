use super::motifs::{self, FeedforwardMotif};
use super::sparse::CsrMatrix;
use crate::error::{ensure_finite, GeneSimError, Result};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A weighted regulatory edge `source -> target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationConnection {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl RegulationConnection {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Immutable weighted directed graph over a fixed, ordered set of genes.
///
/// The adjacency matrix is stored row-compressed with row = target and
/// column = source, so `adjacency * expression` yields each gene's
/// aggregate regulatory input. Edits build a new network.
#[derive(Debug, Clone)]
pub struct RegulatoryNetwork {
    gene_names: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: CsrMatrix,
    outgoing: CsrMatrix,
    is_acyclic: bool,
    detect_circuits: bool,
    circuits: Option<Vec<BTreeSet<String>>>,
    feedforward_motifs: Option<Vec<FeedforwardMotif>>,
}

impl RegulatoryNetwork {
    /// Validates every interaction before allocating the matrix. Circuit
    /// and feedforward analysis only runs when `detect_circuits` is set.
    pub fn new<S: Into<String>>(
        gene_names: impl IntoIterator<Item = S>,
        interactions: &[RegulationConnection],
        detect_circuits: bool,
    ) -> Result<Self> {
        let gene_names: Vec<String> = gene_names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(gene_names.len());
        for (i, name) in gene_names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(GeneSimError::Configuration(format!(
                    "duplicate gene name '{}'",
                    name
                )));
            }
        }

        let mut triplets = Vec::with_capacity(interactions.len());
        for connection in interactions {
            if connection.source == connection.target {
                return Err(GeneSimError::Configuration(format!(
                    "self-loop on gene '{}' is not allowed",
                    connection.source
                )));
            }
            ensure_finite(
                &format!("weight of {} -> {}", connection.source, connection.target),
                connection.weight,
            )?;
            let source = lookup(&index, &connection.source)?;
            let target = lookup(&index, &connection.target)?;
            triplets.push((target, source, connection.weight));
        }

        let n = gene_names.len();
        let adjacency = CsrMatrix::from_triplets(n, n, &triplets)?;
        let outgoing = adjacency.transpose();
        let graph = motifs::to_digraph(&outgoing);
        let is_acyclic = motifs::is_acyclic(&graph);

        let (circuits, feedforward_motifs) = if detect_circuits {
            let circuits: Vec<BTreeSet<String>> = motifs::feedback_circuits(&graph)
                .into_iter()
                .map(|members| members.into_iter().map(|i| gene_names[i].clone()).collect())
                .collect();
            let feedforward: Vec<FeedforwardMotif> = motifs::feedforward_triples(&outgoing)
                .into_iter()
                .map(|(a, b, c)| FeedforwardMotif {
                    regulator: gene_names[a].clone(),
                    intermediate: gene_names[b].clone(),
                    target: gene_names[c].clone(),
                })
                .collect();
            (Some(circuits), Some(feedforward))
        } else {
            (None, None)
        };

        log::trace!(
            "built regulatory network: {} genes, {} interactions, acyclic={}",
            n,
            adjacency.nnz(),
            is_acyclic
        );

        Ok(Self {
            gene_names,
            index,
            adjacency,
            outgoing,
            is_acyclic,
            detect_circuits,
            circuits,
            feedforward_motifs,
        })
    }

    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    pub fn n_genes(&self) -> usize {
        self.gene_names.len()
    }

    pub fn n_interactions(&self) -> usize {
        self.adjacency.nnz()
    }

    pub fn index_of(&self, gene: &str) -> Option<usize> {
        self.index.get(gene).copied()
    }

    /// Row = target, column = source.
    pub fn adjacency(&self) -> &CsrMatrix {
        &self.adjacency
    }

    pub fn is_acyclic(&self) -> bool {
        self.is_acyclic
    }

    /// Feedback loops, or `None` when analysis was not requested.
    pub fn circuits(&self) -> Option<&[BTreeSet<String>]> {
        self.circuits.as_deref()
    }

    pub fn feedforward_motifs(&self) -> Option<&[FeedforwardMotif]> {
        self.feedforward_motifs.as_deref()
    }

    /// Total weight of `source -> target`; 0 when the edge is absent.
    pub fn weight(&self, source: &str, target: &str) -> Result<f64> {
        let source = lookup(&self.index, source)?;
        let target = lookup(&self.index, target)?;
        Ok(self.adjacency.get(target, source))
    }

    /// Genes with an edge into `gene`, with their weights.
    pub fn regulators_of(&self, gene: &str) -> Result<Vec<(&str, f64)>> {
        let target = lookup(&self.index, gene)?;
        Ok(self
            .adjacency
            .row(target)
            .map(|(source, w)| (self.gene_names[source].as_str(), w))
            .collect())
    }

    /// Genes that `gene` regulates, with their weights.
    pub fn targets_of(&self, gene: &str) -> Result<Vec<(&str, f64)>> {
        let source = lookup(&self.index, gene)?;
        Ok(self
            .outgoing
            .row(source)
            .map(|(target, w)| (self.gene_names[target].as_str(), w))
            .collect())
    }

    /// All stored interactions, grouped by source gene.
    pub fn interactions(&self) -> Vec<RegulationConnection> {
        (0..self.n_genes())
            .flat_map(|source| {
                self.outgoing.row(source).map(move |(target, weight)| {
                    RegulationConnection::new(
                        self.gene_names[source].clone(),
                        self.gene_names[target].clone(),
                        weight,
                    )
                })
            })
            .collect()
    }

    /// Per-gene regulatory input for one expression vector.
    pub fn compute_tf_inputs(&self, expression: &[f64]) -> Result<Vec<f64>> {
        self.adjacency.mul_vec(expression)
    }

    /// Regulatory input for a whole population at once; rows are
    /// individuals, columns are genes.
    pub fn compute_tf_inputs_batch(&self, expression: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.adjacency.mul_rows(expression)
    }

    /// `compute_tf_inputs_batch` into a caller-owned buffer of the same shape.
    pub fn compute_tf_inputs_batch_into(
        &self,
        expression: ArrayView2<f64>,
        out: ArrayViewMut2<f64>,
    ) -> Result<()> {
        self.adjacency.mul_rows_into(expression, out)
    }

    /// New network with one more interaction; `self` is unchanged.
    pub fn with_interaction(&self, connection: RegulationConnection) -> Result<Self> {
        let mut interactions = self.interactions();
        interactions.push(connection);
        Self::new(self.gene_names.iter().cloned(), &interactions, self.detect_circuits)
    }

    /// New network without any `source -> target` edge.
    pub fn without_interaction(&self, source: &str, target: &str) -> Result<Self> {
        lookup(&self.index, source)?;
        lookup(&self.index, target)?;
        let interactions: Vec<_> = self
            .interactions()
            .into_iter()
            .filter(|c| !(c.source == source && c.target == target))
            .collect();
        Self::new(self.gene_names.iter().cloned(), &interactions, self.detect_circuits)
    }
}

fn lookup(index: &HashMap<String, usize>, gene: &str) -> Result<usize> {
    index
        .get(gene)
        .copied()
        .ok_or_else(|| GeneSimError::Configuration(format!("unknown gene '{}'", gene)))
}
