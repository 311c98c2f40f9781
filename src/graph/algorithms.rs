//! Connectivity algorithms over coauthorship graphs

use std::collections::{BTreeMap, VecDeque};

use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::graph::CoauthorGraph;

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Rank/size of each set (for union by rank)
    rank: Vec<u32>,
}

impl DisjointSets {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let parent = self.parent[x as usize];
        if parent != x {
            self.parent[x as usize] = self.find(parent);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Union by rank: attach smaller tree under root of larger tree
        if self.rank[root_x as usize] > self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }
}

/// Group nodes into connected components, in node-index order
pub fn connected_components(graph: &CoauthorGraph) -> Vec<Vec<NodeIndex>> {
    let mut sets = DisjointSets::new(graph.node_count());

    for (source, target, _) in graph.edges() {
        sets.union(source.index() as u32, target.index() as u32);
    }

    let mut components: BTreeMap<u32, Vec<NodeIndex>> = BTreeMap::new();
    for node in graph.node_indices() {
        let root = sets.find(node.index() as u32);
        components.entry(root).or_default().push(node);
    }

    components.into_values().collect()
}

/// Nodes of the largest connected component; empty for the empty graph
pub fn largest_component(graph: &CoauthorGraph) -> Vec<NodeIndex> {
    connected_components(graph)
        .into_iter()
        .max_by_key(Vec::len)
        .unwrap_or_default()
}

/// BFS hop distances from a source node; -1 marks unreachable nodes
pub fn bfs_distances(graph: &CoauthorGraph, source: NodeIndex) -> Vec<i32> {
    let mut distances = vec![-1_i32; graph.node_count()];
    distances[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        let next_distance = distances[node.index()] + 1;
        for neighbor in graph.neighbors(node) {
            if distances[neighbor.index()] < 0 {
                distances[neighbor.index()] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

/// Average of inverse shortest-path distances over all ordered node pairs.
///
/// Disconnected pairs contribute 0; graphs with fewer than two nodes have
/// efficiency 0.
pub fn global_efficiency(graph: &CoauthorGraph) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }

    // Per-source sums are reduced in node order so repeated measurements of
    // the same graph are bit-identical.
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    let per_source: Vec<f64> = nodes
        .par_iter()
        .map(|&source| {
            bfs_distances(graph, source)
                .into_iter()
                .filter(|&distance| distance > 0)
                .map(|distance| 1.0 / f64::from(distance))
                .sum::<f64>()
        })
        .collect();

    per_source.iter().sum::<f64>() / (n * (n - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AuthorNode;

    fn path_graph(ids: &[&str]) -> CoauthorGraph {
        let mut graph = CoauthorGraph::new();
        for id in ids {
            graph.add_author(AuthorNode {
                id: id.to_string(),
                ..Default::default()
            });
        }
        for pair in ids.windows(2) {
            graph.record_coauthorship(pair[0], pair[1]);
        }
        graph
    }

    #[test]
    fn components_of_disconnected_graph() {
        let mut graph = path_graph(&["A1", "A2"]);
        graph.add_author(AuthorNode {
            id: "A3".to_string(),
            ..Default::default()
        });

        let components = connected_components(&graph);
        assert_eq!(components.len(), 2);
        assert_eq!(largest_component(&graph).len(), 2);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let graph = CoauthorGraph::new();
        assert!(connected_components(&graph).is_empty());
        assert!(largest_component(&graph).is_empty());
        assert_eq!(global_efficiency(&graph), 0.0);
    }

    #[test]
    fn bfs_distances_on_path() {
        let graph = path_graph(&["A1", "A2", "A3"]);
        let source = graph.node_index("A1").unwrap();
        let distances = bfs_distances(&graph, source);
        assert_eq!(distances, vec![0, 1, 2]);
    }

    #[test]
    fn bfs_marks_unreachable() {
        let mut graph = path_graph(&["A1", "A2"]);
        graph.add_author(AuthorNode {
            id: "A3".to_string(),
            ..Default::default()
        });
        let source = graph.node_index("A1").unwrap();
        let distances = bfs_distances(&graph, source);
        assert_eq!(distances[2], -1);
    }

    #[test]
    fn efficiency_of_path_of_three() {
        // Pairs: two at distance 1, one at distance 2, ordered both ways
        let graph = path_graph(&["A1", "A2", "A3"]);
        let expected = (2.0 * 1.0 + 2.0 * 1.0 + 2.0 * 0.5) / 6.0;
        assert!((global_efficiency(&graph) - expected).abs() < 1e-12);
    }

    #[test]
    fn efficiency_ignores_disconnected_pairs() {
        let mut graph = path_graph(&["A1", "A2"]);
        graph.add_author(AuthorNode {
            id: "A3".to_string(),
            ..Default::default()
        });
        // Only the A1-A2 pair contributes, over 3*2 ordered pairs
        assert!((global_efficiency(&graph) - 2.0 / 6.0).abs() < 1e-12);
    }
}
