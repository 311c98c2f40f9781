//! Centrality measures: betweenness, closeness, eigenvector

use std::collections::{BTreeMap, VecDeque};

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use thiserror::Error;

use crate::config::EigenvectorConfig;
use crate::graph::algorithms::bfs_distances;
use crate::graph::CoauthorGraph;

/// Below this node count the per-source passes run sequentially
const PARALLEL_SOURCE_THRESHOLD: usize = 512;

/// Power iteration reached its bound without meeting the tolerance
#[derive(Debug, Error)]
#[error("power iteration failed to converge within {max_iterations} iterations")]
pub struct ConvergenceError {
    pub max_iterations: usize,
}

/// Betweenness centrality via Brandes' algorithm, normalized to [0, 1].
///
/// Graphs with fewer than three nodes have no intermediary positions; every
/// score is 0.
pub fn betweenness_centrality(graph: &CoauthorGraph) -> BTreeMap<String, f64> {
    let n = graph.node_count();
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();

    if n <= 2 {
        return nodes
            .iter()
            .map(|&node| (graph.author(node).id.clone(), 0.0))
            .collect();
    }

    let zero = || vec![0.0_f64; n];
    let add = |mut left: Vec<f64>, right: Vec<f64>| {
        for (accumulated, value) in left.iter_mut().zip(right) {
            *accumulated += value;
        }
        left
    };

    // Accumulate source dependencies; parallel pays off only past a few
    // hundred BFS sources.
    let accumulated = if n >= PARALLEL_SOURCE_THRESHOLD {
        nodes
            .par_iter()
            .map(|&source| brandes_pass(graph, source))
            .reduce(zero, add)
    } else {
        nodes
            .iter()
            .map(|&source| brandes_pass(graph, source))
            .fold(zero(), add)
    };

    // Undirected accumulation visits each pair from both endpoints, and
    // (n-1)(n-2) is that doubled pair count, matching the usual
    // normalization.
    let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
    nodes
        .iter()
        .map(|&node| {
            (
                graph.author(node).id.clone(),
                accumulated[node.index()] * scale,
            )
        })
        .collect()
}

/// One source pass of Brandes' algorithm: BFS forward, dependency
/// accumulation backward
fn brandes_pass(graph: &CoauthorGraph, source: NodeIndex) -> Vec<f64> {
    let n = graph.node_count();
    let mut visit_order: Vec<NodeIndex> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut path_counts = vec![0.0_f64; n];
    let mut distances = vec![-1_i32; n];

    path_counts[source.index()] = 1.0;
    distances[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(node) = queue.pop_front() {
        visit_order.push(node);
        for neighbor in graph.neighbors(node) {
            if distances[neighbor.index()] < 0 {
                distances[neighbor.index()] = distances[node.index()] + 1;
                queue.push_back(neighbor);
            }
            if distances[neighbor.index()] == distances[node.index()] + 1 {
                path_counts[neighbor.index()] += path_counts[node.index()];
                predecessors[neighbor.index()].push(node);
            }
        }
    }

    let mut dependencies = vec![0.0_f64; n];
    let mut contribution = vec![0.0_f64; n];
    while let Some(node) = visit_order.pop() {
        for &predecessor in &predecessors[node.index()] {
            dependencies[predecessor.index()] += path_counts[predecessor.index()]
                / path_counts[node.index()]
                * (1.0 + dependencies[node.index()]);
        }
        if node != source {
            contribution[node.index()] = dependencies[node.index()];
        }
    }

    contribution
}

/// Closeness centrality with the reachable-fraction correction, so scores on
/// disconnected graphs stay comparable. Isolated nodes score 0.
pub fn closeness_centrality(graph: &CoauthorGraph) -> BTreeMap<String, f64> {
    let n = graph.node_count();
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();

    let closeness_of = |&source: &NodeIndex| {
        let distances = bfs_distances(graph, source);
        let reachable = distances.iter().filter(|&&distance| distance >= 0).count();
        let total: i64 = distances
            .iter()
            .filter(|&&distance| distance > 0)
            .map(|&distance| i64::from(distance))
            .sum();

        let score = if total > 0 && n > 1 {
            let fraction = (reachable - 1) as f64;
            (fraction / total as f64) * (fraction / (n - 1) as f64)
        } else {
            0.0
        };
        (graph.author(source).id.clone(), score)
    };

    if n >= PARALLEL_SOURCE_THRESHOLD {
        nodes.par_iter().map(closeness_of).collect()
    } else {
        nodes.iter().map(closeness_of).collect()
    }
}

/// Eigenvector centrality via power iteration with a bounded iteration count.
///
/// Scores are L2-normalized. The empty graph is structurally ineligible and
/// yields an empty mapping; exhausting the bound yields `ConvergenceError`.
pub fn eigenvector_centrality(
    graph: &CoauthorGraph,
    config: EigenvectorConfig,
) -> Result<BTreeMap<String, f64>, ConvergenceError> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(BTreeMap::new());
    }

    let uniform = 1.0 / (n as f64).sqrt();
    let mut scores = vec![uniform; n];
    let mut next = vec![0.0_f64; n];

    for _ in 0..config.max_iterations {
        // Iterate with A + I: the identity shift keeps bipartite components
        // from oscillating between two states.
        next.copy_from_slice(&scores);
        for node in graph.node_indices() {
            for neighbor in graph.neighbors(node) {
                next[node.index()] += scores[neighbor.index()];
            }
        }

        let norm = next.iter().map(|score| score * score).sum::<f64>().sqrt();
        for score in &mut next {
            *score /= norm;
        }

        let difference = scores
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).powi(2))
            .sum::<f64>()
            .sqrt();

        std::mem::swap(&mut scores, &mut next);

        if difference < config.tolerance {
            return Ok(graph
                .node_indices()
                .map(|node| (graph.author(node).id.clone(), scores[node.index()]))
                .collect());
        }
    }

    Err(ConvergenceError {
        max_iterations: config.max_iterations,
    })
}
