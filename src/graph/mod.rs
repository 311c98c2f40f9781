//! Coauthorship graph representation and construction

pub mod algorithms;
pub mod builder;

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::data::authors::AuthorRecord;

/// Node attributes carried by every author in a snapshot.
///
/// Fields default to empty strings when the resolved record lacks them, so
/// exported graphs always carry the full attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorNode {
    pub id: String,
    pub display_name: String,
    pub orcid: String,
    pub country: String,
    pub raw_author_name: String,
    pub institution_id: String,
    pub institution_display_name: String,
    pub institution_country_code: String,
}

impl AuthorNode {
    pub fn from_record(record: &AuthorRecord) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            id: record.id.clone(),
            display_name: field(&record.display_name),
            orcid: field(&record.orcid),
            country: field(&record.country),
            raw_author_name: field(&record.raw_author_name),
            institution_id: field(&record.institution_id),
            institution_display_name: field(&record.institution_display_name),
            institution_country_code: field(&record.institution_country_code),
        }
    }
}

/// Weighted undirected coauthorship graph for one year snapshot.
///
/// Nodes are authors keyed by identifier; edge weights count co-published
/// works. Self-edges are never created.
#[derive(Debug, Clone, Default)]
pub struct CoauthorGraph {
    graph: UnGraph<AuthorNode, u32>,
    index: HashMap<String, NodeIndex>,
}

impl CoauthorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an author node; an already-present identifier keeps its node
    pub fn add_author(&mut self, node: AuthorNode) -> NodeIndex {
        if let Some(&existing) = self.index.get(&node.id) {
            return existing;
        }
        let id = node.id.clone();
        let added = self.graph.add_node(node);
        self.index.insert(id, added);
        added
    }

    /// Record one co-published work between two authors.
    ///
    /// Increments the edge weight, creating the edge at weight 1 on first
    /// occurrence. Pairs where either endpoint is not a node, and self-pairs,
    /// are skipped.
    pub fn record_coauthorship(&mut self, a: &str, b: &str) {
        let (Some(&source), Some(&target)) = (self.index.get(a), self.index.get(b)) else {
            return;
        };
        if source == target {
            return;
        }
        match self.graph.find_edge(source, target) {
            Some(edge) => {
                if let Some(weight) = self.graph.edge_weight_mut(edge) {
                    *weight += 1;
                }
            }
            None => {
                self.graph.add_edge(source, target, 1);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn author(&self, node: NodeIndex) -> &AuthorNode {
        &self.graph[node]
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    pub fn degree(&self, node: NodeIndex) -> usize {
        self.graph.neighbors(node).count()
    }

    /// Edge weight between two authors, if the edge exists
    pub fn coauthorship_weight(&self, a: &str, b: &str) -> Option<u32> {
        let (source, target) = (self.node_index(a)?, self.node_index(b)?);
        let edge = self.graph.find_edge(source, target)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Iterate edges as (source, target, weight)
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, u32)> + '_ {
        use petgraph::visit::EdgeRef;
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), *edge.weight()))
    }

    /// Copy of this graph with the given authors (and incident edges) removed.
    ///
    /// Rebuilds rather than removing in place, keeping node indices dense for
    /// the index-addressed algorithms.
    pub fn without_nodes(&self, remove: &HashSet<&str>) -> CoauthorGraph {
        let mut residual = CoauthorGraph::new();
        for node in self.graph.node_indices() {
            let author = &self.graph[node];
            if !remove.contains(author.id.as_str()) {
                residual.add_author(author.clone());
            }
        }
        for (source, target, weight) in self.edges() {
            let source_id = self.graph[source].id.as_str();
            let target_id = self.graph[target].id.as_str();
            if let (Some(&a), Some(&b)) = (
                residual.index.get(source_id),
                residual.index.get(target_id),
            ) {
                residual.graph.add_edge(a, b, weight);
            }
        }
        residual
    }
}
