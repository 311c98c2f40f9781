//! Targeted node-removal robustness analysis

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::algorithms::{global_efficiency, largest_component};
use crate::graph::CoauthorGraph;
use crate::metrics;

/// Centrality measure used to rank hub candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubMetric {
    Degree,
    Betweenness,
    Closeness,
    Eigenvector,
}

impl HubMetric {
    pub const CHOICES: [HubMetric; 4] = [
        HubMetric::Degree,
        HubMetric::Betweenness,
        HubMetric::Closeness,
        HubMetric::Eigenvector,
    ];

    /// Key of the per-node mapping inside a metrics report
    pub fn report_key(self) -> &'static str {
        match self {
            HubMetric::Degree => metrics::DEGREES_KEY,
            HubMetric::Betweenness => metrics::BETWEENNESS_KEY,
            HubMetric::Closeness => metrics::CLOSENESS_KEY,
            HubMetric::Eigenvector => metrics::EIGENVECTOR_KEY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HubMetric::Degree => "degree",
            HubMetric::Betweenness => "betweenness",
            HubMetric::Closeness => "closeness",
            HubMetric::Eigenvector => "eigenvector",
        }
    }
}

impl fmt::Display for HubMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HubMetric {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        HubMetric::CHOICES
            .into_iter()
            .find(|metric| metric.name() == value)
            .ok_or_else(|| {
                format!("unknown centrality metric '{value}' (expected degree, betweenness, closeness or eigenvector)")
            })
    }
}

/// Node/edge counts, LCC size and efficiency of one graph state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSnapshot {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub lcc_size: usize,
    pub global_efficiency: f64,
}

impl AttackSnapshot {
    pub fn measure(graph: &CoauthorGraph) -> Self {
        Self {
            num_nodes: graph.node_count(),
            num_edges: graph.edge_count(),
            lcc_size: largest_component(graph).len(),
            global_efficiency: global_efficiency(graph),
        }
    }
}

/// Before/after deltas of one simulated attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackImpact {
    pub lcc_size_reduction_percent: f64,
    pub global_efficiency_delta: f64,
}

/// How the removed hubs were selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubSelection {
    pub metric_used: String,
    pub analysis_scope: String,
    pub num_hubs_requested: usize,
    pub hubs_ids: Vec<String>,
}

/// Result of one hub-removal simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub before_attack: AttackSnapshot,
    pub after_attack: AttackSnapshot,
    pub impact: AttackImpact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hubs_removed_info: Option<HubSelection>,
}

/// Rank nodes descending by centrality score and keep up to `top_n`.
///
/// The sort is stable over the map's ascending-identifier iteration order,
/// so ties resolve to lexicographically smaller identifiers first. NaN
/// scores compare as equal.
pub fn identify_hubs(centrality: &BTreeMap<String, f64>, top_n: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> = centrality
        .iter()
        .map(|(id, &score)| (id, score))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(id, _)| id.clone())
        .collect()
}

/// Restrict a hub candidate pool to nodes of the graph's largest connected
/// component. Only the candidate pool changes; attacks still run on the
/// full graph.
pub fn restrict_to_lcc(
    centrality: &BTreeMap<String, f64>,
    graph: &CoauthorGraph,
) -> BTreeMap<String, f64> {
    let lcc_ids: HashSet<&str> = largest_component(graph)
        .into_iter()
        .map(|node| graph.author(node).id.as_str())
        .collect();

    centrality
        .iter()
        .filter(|(id, _)| lcc_ids.contains(id.as_str()))
        .map(|(id, &score)| (id.clone(), score))
        .collect()
}

/// Simulate removing the given nodes and compare connectivity before/after.
///
/// Identifiers absent from the graph are ignored by the removal. LCC
/// reduction is 0 when the original LCC is already empty.
pub fn analyze_attack(graph: &CoauthorGraph, nodes_to_remove: &[String]) -> AttackResult {
    log::info!(
        "Simulating attack removing {} of {} nodes",
        nodes_to_remove.len(),
        graph.node_count()
    );

    let before_attack = AttackSnapshot::measure(graph);

    let remove: HashSet<&str> = nodes_to_remove.iter().map(String::as_str).collect();
    let residual = graph.without_nodes(&remove);
    let after_attack = AttackSnapshot::measure(&residual);

    let lcc_size_reduction_percent = if before_attack.lcc_size == 0 {
        0.0
    } else {
        (before_attack.lcc_size - after_attack.lcc_size) as f64
            / before_attack.lcc_size as f64
            * 100.0
    };

    let impact = AttackImpact {
        lcc_size_reduction_percent,
        global_efficiency_delta: before_attack.global_efficiency - after_attack.global_efficiency,
    };

    AttackResult {
        before_attack,
        after_attack,
        impact,
        hubs_removed_info: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AuthorNode;

    fn complete_graph(ids: &[&str]) -> CoauthorGraph {
        let mut graph = CoauthorGraph::new();
        for id in ids {
            graph.add_author(AuthorNode {
                id: id.to_string(),
                ..Default::default()
            });
        }
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                graph.record_coauthorship(a, b);
            }
        }
        graph
    }

    #[test]
    fn hubs_ranked_descending() {
        let centrality = BTreeMap::from([
            ("A1".to_string(), 0.2),
            ("A2".to_string(), 0.9),
            ("A3".to_string(), 0.5),
        ]);
        assert_eq!(identify_hubs(&centrality, 2), vec!["A2", "A3"]);
    }

    #[test]
    fn hub_ties_resolve_by_identifier() {
        let centrality = BTreeMap::from([
            ("A2".to_string(), 0.5),
            ("A1".to_string(), 0.5),
            ("A3".to_string(), 0.5),
        ]);
        assert_eq!(identify_hubs(&centrality, 2), vec!["A1", "A2"]);
    }

    #[test]
    fn empty_candidates_and_zero_top_n() {
        assert!(identify_hubs(&BTreeMap::new(), 5).is_empty());
        let centrality = BTreeMap::from([("A1".to_string(), 1.0)]);
        assert!(identify_hubs(&centrality, 0).is_empty());
    }

    #[test]
    fn top_n_larger_than_pool_returns_all() {
        let centrality = BTreeMap::from([("A1".to_string(), 1.0), ("A2".to_string(), 0.5)]);
        assert_eq!(identify_hubs(&centrality, 10).len(), 2);
    }

    #[test]
    fn empty_removal_reproduces_before_metrics() {
        let graph = complete_graph(&["A1", "A2", "A3"]);
        let result = analyze_attack(&graph, &[]);
        assert_eq!(result.before_attack, result.after_attack);
        assert_eq!(result.impact.lcc_size_reduction_percent, 0.0);
        assert_eq!(result.impact.global_efficiency_delta, 0.0);
    }

    #[test]
    fn removing_every_node_reduces_lcc_fully() {
        let graph = complete_graph(&["A1", "A2", "A3", "A4"]);
        let all: Vec<String> = ["A1", "A2", "A3", "A4"]
            .iter()
            .map(|id| id.to_string())
            .collect();
        let result = analyze_attack(&graph, &all);
        assert_eq!(result.after_attack.lcc_size, 0);
        assert_eq!(result.after_attack.num_nodes, 0);
        assert_eq!(result.after_attack.global_efficiency, 0.0);
        assert_eq!(result.impact.lcc_size_reduction_percent, 100.0);
    }

    #[test]
    fn attack_on_empty_graph_has_zero_reduction() {
        let graph = CoauthorGraph::new();
        let result = analyze_attack(&graph, &["A1".to_string()]);
        assert_eq!(result.before_attack.lcc_size, 0);
        assert_eq!(result.impact.lcc_size_reduction_percent, 0.0);
    }

    #[test]
    fn lcc_restriction_filters_candidate_pool() {
        let mut graph = complete_graph(&["A1", "A2", "A3"]);
        graph.add_author(AuthorNode {
            id: "A9".to_string(),
            ..Default::default()
        });
        let centrality = BTreeMap::from([
            ("A1".to_string(), 0.1),
            ("A9".to_string(), 9.0),
        ]);
        let restricted = restrict_to_lcc(&centrality, &graph);
        assert_eq!(restricted.len(), 1);
        assert!(restricted.contains_key("A1"));
    }

    #[test]
    fn metric_names_round_trip() {
        for metric in HubMetric::CHOICES {
            assert_eq!(metric.name().parse::<HubMetric>().unwrap(), metric);
        }
        assert!("pagerank".parse::<HubMetric>().is_err());
    }
}
