use super::sparse::CsrMatrix;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

/// Genes A, B, C with edges A->B, A->C and B->C.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedforwardMotif {
    pub regulator: String,
    pub intermediate: String,
    pub target: String,
}

/// Directed graph over gene indices built from the outgoing adjacency
/// (row = source, column = target).
pub(crate) fn to_digraph(outgoing: &CsrMatrix) -> DiGraph<usize, f64> {
    let (n, _) = outgoing.shape();
    let mut graph = DiGraph::with_capacity(n, outgoing.nnz());
    let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
    for source in 0..n {
        for (target, weight) in outgoing.row(source) {
            graph.add_edge(nodes[source], nodes[target], weight);
        }
    }
    graph
}

pub(crate) fn is_acyclic(graph: &DiGraph<usize, f64>) -> bool {
    !is_cyclic_directed(graph)
}

/// Strongly connected components with more than one gene, each sorted by
/// gene index, ordered by their first gene. O(n + k).
pub(crate) fn feedback_circuits(graph: &DiGraph<usize, f64>) -> Vec<Vec<usize>> {
    let mut circuits: Vec<Vec<usize>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut genes: Vec<usize> = component.into_iter().map(|node| graph[node]).collect();
            genes.sort_unstable();
            genes
        })
        .collect();
    circuits.sort();
    circuits
}

/// Enumerates every `(a, b, c)` with a->b, b->c and a->c by composing
/// adjacent edge pairs. O(n^3) in the worst case.
pub(crate) fn feedforward_triples(outgoing: &CsrMatrix) -> Vec<(usize, usize, usize)> {
    let (n, _) = outgoing.shape();
    let successors: Vec<Vec<usize>> = (0..n)
        .map(|source| {
            let mut targets: Vec<usize> = outgoing.row(source).map(|(t, _)| t).collect();
            targets.sort_unstable();
            targets.dedup();
            targets
        })
        .collect();

    let mut triples = Vec::new();
    for a in 0..n {
        for &b in &successors[a] {
            for &c in &successors[b] {
                if c != a && successors[a].binary_search(&c).is_ok() {
                    triples.push((a, b, c));
                }
            }
        }
    }
    triples
}
