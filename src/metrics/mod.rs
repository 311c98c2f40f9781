//! Structural metrics over one graph snapshot

pub mod centrality;

use std::collections::{BTreeMap, HashSet};

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::EigenvectorConfig;
use crate::graph::algorithms::{bfs_distances, largest_component};
use crate::graph::CoauthorGraph;

/// Report keys that hold a per-node centrality mapping
pub const DEGREES_KEY: &str = "degrees";
pub const BETWEENNESS_KEY: &str = "betweenness_centrality";
pub const CLOSENESS_KEY: &str = "closeness_centrality";
pub const EIGENVECTOR_KEY: &str = "eigenvector_centrality";

/// Eigenvector centrality result: per-node scores, or a failure sentinel
/// when power iteration did not converge within its bound
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EigenvectorOutcome {
    Converged(BTreeMap<String, f64>),
    FailedConvergence(String),
}

impl EigenvectorOutcome {
    pub fn scores(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            Self::Converged(scores) => Some(scores),
            Self::FailedConvergence(_) => None,
        }
    }
}

/// Flat metrics mapping computed over exactly one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub largest_component_size: usize,
    pub degrees: BTreeMap<String, usize>,
    pub average_degree: f64,
    pub degree_histogram: BTreeMap<usize, usize>,
    pub clustering: BTreeMap<String, f64>,
    pub average_clustering: f64,
    pub average_shortest_path_length: Option<f64>,
    pub degree_assortativity: Option<f64>,
    pub betweenness_centrality: BTreeMap<String, f64>,
    pub closeness_centrality: BTreeMap<String, f64>,
    pub eigenvector_centrality: EigenvectorOutcome,
}

impl MetricsReport {
    /// Per-node scores for a centrality key, converting degrees to floats.
    ///
    /// `None` for unknown keys and for an eigenvector field holding the
    /// non-convergence sentinel.
    pub fn centrality_for(&self, key: &str) -> Option<BTreeMap<String, f64>> {
        match key {
            DEGREES_KEY => Some(
                self.degrees
                    .iter()
                    .map(|(id, &degree)| (id.clone(), degree as f64))
                    .collect(),
            ),
            BETWEENNESS_KEY => Some(self.betweenness_centrality.clone()),
            CLOSENESS_KEY => Some(self.closeness_centrality.clone()),
            EIGENVECTOR_KEY => self.eigenvector_centrality.scores().cloned(),
            _ => None,
        }
    }
}

/// Compute the full metric battery for one snapshot.
///
/// Metrics are computed independently; a failing or undefined metric
/// degrades to its sentinel without affecting the others, and no input graph
/// causes an error.
pub fn compute_metrics(graph: &CoauthorGraph, eigenvector: EigenvectorConfig) -> MetricsReport {
    let num_nodes = graph.node_count();
    let num_edges = graph.edge_count();
    log::info!("Computing metrics for graph with {num_nodes} nodes and {num_edges} edges");

    let degrees = degree_map(graph);
    let average_degree = if num_nodes == 0 {
        0.0
    } else {
        degrees.values().sum::<usize>() as f64 / num_nodes as f64
    };

    let mut degree_histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for &degree in degrees.values() {
        *degree_histogram.entry(degree).or_insert(0) += 1;
    }

    let clustering = local_clustering(graph);
    let average_clustering = if num_nodes == 0 {
        0.0
    } else {
        clustering.values().sum::<f64>() / num_nodes as f64
    };

    let lcc = largest_component(graph);

    let eigenvector_centrality = match centrality::eigenvector_centrality(graph, eigenvector) {
        Ok(scores) => EigenvectorOutcome::Converged(scores),
        Err(err) => {
            log::warn!("eigenvector centrality failed: {err}");
            EigenvectorOutcome::FailedConvergence(err.to_string())
        }
    };

    MetricsReport {
        num_nodes,
        num_edges,
        largest_component_size: lcc.len(),
        average_degree,
        degree_histogram,
        average_clustering,
        average_shortest_path_length: average_shortest_path_length(graph, &lcc),
        degree_assortativity: degree_assortativity(graph),
        betweenness_centrality: centrality::betweenness_centrality(graph),
        closeness_centrality: centrality::closeness_centrality(graph),
        eigenvector_centrality,
        degrees,
        clustering,
    }
}

fn degree_map(graph: &CoauthorGraph) -> BTreeMap<String, usize> {
    graph
        .node_indices()
        .map(|node| (graph.author(node).id.clone(), graph.degree(node)))
        .collect()
}

/// Local clustering coefficient per node: closed neighbor pairs over
/// possible neighbor pairs, 0 for degree below 2
fn local_clustering(graph: &CoauthorGraph) -> BTreeMap<String, f64> {
    graph
        .node_indices()
        .map(|node| {
            let neighbors: HashSet<NodeIndex> = graph.neighbors(node).collect();
            let k = neighbors.len();
            let coefficient = if k < 2 {
                0.0
            } else {
                let mut closed = 0usize;
                for &u in &neighbors {
                    for v in graph.neighbors(u) {
                        if u.index() < v.index() && neighbors.contains(&v) {
                            closed += 1;
                        }
                    }
                }
                2.0 * closed as f64 / (k * (k - 1)) as f64
            };
            (graph.author(node).id.clone(), coefficient)
        })
        .collect()
}

/// Mean shortest-path length over ordered pairs of the largest component;
/// undefined when that component has fewer than two nodes
fn average_shortest_path_length(graph: &CoauthorGraph, lcc: &[NodeIndex]) -> Option<f64> {
    let m = lcc.len();
    if m < 2 {
        return None;
    }

    // BFS from a component member stays within the component, so every
    // positive distance is an intra-component pair. Summing in source order
    // keeps the result independent of scheduling.
    let per_source: Vec<f64> = lcc
        .par_iter()
        .map(|&source| {
            bfs_distances(graph, source)
                .into_iter()
                .filter(|&distance| distance > 0)
                .map(f64::from)
                .sum::<f64>()
        })
        .collect();

    Some(per_source.iter().sum::<f64>() / (m * (m - 1)) as f64)
}

/// Pearson correlation between the degrees of connected node pairs, over the
/// symmetrized edge list; undefined without edges or degree variance
fn degree_assortativity(graph: &CoauthorGraph) -> Option<f64> {
    let degrees: Vec<f64> = graph
        .node_indices()
        .map(|node| graph.degree(node) as f64)
        .collect();

    let mut source_degrees = Vec::with_capacity(graph.edge_count() * 2);
    let mut target_degrees = Vec::with_capacity(graph.edge_count() * 2);
    for (source, target, _) in graph.edges() {
        source_degrees.push(degrees[source.index()]);
        target_degrees.push(degrees[target.index()]);
        source_degrees.push(degrees[target.index()]);
        target_degrees.push(degrees[source.index()]);
    }

    if source_degrees.is_empty() {
        return None;
    }

    let covariance = source_degrees
        .iter()
        .population_covariance(target_degrees.iter());
    let spread = source_degrees.iter().population_std_dev()
        * target_degrees.iter().population_std_dev();

    let coefficient = covariance / spread;
    coefficient.is_finite().then_some(coefficient)
}
