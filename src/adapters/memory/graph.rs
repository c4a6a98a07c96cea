use crate::domain::edge::{DependencyEdge, DependencyKind};
use crate::domain::identity::ObjectIdentity;
use crate::domain::ports::DependencyGraph;
use anyhow::Result;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Per-project dependency graph held in memory.
///
/// Graph edges point from the dependent (source) to its dependency (target),
/// so dependants are the incoming neighbours of a target node.
#[derive(Debug, Default)]
pub struct PetgraphDependencyGraph {
    graph: DiGraph<ObjectIdentity, DependencyKind>,
    identity_to_node: HashMap<ObjectIdentity, NodeIndex>,
}

impl PetgraphDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create_node(&mut self, identity: &ObjectIdentity) -> NodeIndex {
        if let Some(&idx) = self.identity_to_node.get(identity) {
            return idx;
        }
        let idx = self.graph.add_node(identity.clone());
        self.identity_to_node.insert(identity.clone(), idx);
        idx
    }

    /// Returns false when the same (source, target, kind) edge already exists.
    pub fn add_edge(&mut self, edge: &DependencyEdge) -> bool {
        let source = self.get_or_create_node(&edge.source);
        let target = self.get_or_create_node(&edge.target);
        let duplicate = self
            .graph
            .edges_connecting(source, target)
            .any(|e| *e.weight() == edge.kind);
        if duplicate {
            return false;
        }
        self.graph.add_edge(source, target, edge.kind);
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.identity_to_node.contains_key(identity)
    }

    pub fn identities(&self) -> impl Iterator<Item = &ObjectIdentity> {
        self.graph.node_weights()
    }
}

impl FromIterator<DependencyEdge> for PetgraphDependencyGraph {
    fn from_iter<I: IntoIterator<Item = DependencyEdge>>(iter: I) -> Self {
        let mut graph = Self::new();
        for edge in iter {
            graph.add_edge(&edge);
        }
        graph
    }
}

impl DependencyGraph for PetgraphDependencyGraph {
    fn dependants(&self, target: &ObjectIdentity) -> Result<Vec<DependencyEdge>> {
        let Some(&idx) = self.identity_to_node.get(target) else {
            return Ok(Vec::new());
        };
        let edges = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| {
                DependencyEdge::new(self.graph[e.source()].clone(), target.clone(), *e.weight())
            })
            .collect();
        Ok(edges)
    }
}
