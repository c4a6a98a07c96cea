use crate::domain::edge::DependencyEdge;
use crate::domain::identity::ProjectId;
use std::collections::{BTreeMap, BTreeSet};

/// Per-project result map: everything invalidated, grouped by owning project.
///
/// Grows monotonically; an edge is stored at most once per project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedDependencies {
    by_project: BTreeMap<ProjectId, BTreeSet<DependencyEdge>>,
}

impl CollectedDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the edge was already recorded for this project.
    pub fn record(&mut self, project: &ProjectId, edge: DependencyEdge) -> bool {
        if self.contains(project, &edge) {
            return false;
        }
        self.by_project
            .entry(project.clone())
            .or_default()
            .insert(edge)
    }

    pub fn contains(&self, project: &ProjectId, edge: &DependencyEdge) -> bool {
        self.by_project
            .get(project)
            .is_some_and(|edges| edges.contains(edge))
    }

    pub fn edges(&self, project: &ProjectId) -> Option<&BTreeSet<DependencyEdge>> {
        self.by_project.get(project)
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectId> {
        self.by_project.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectId, &BTreeSet<DependencyEdge>)> {
        self.by_project.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.by_project.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_project.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<ProjectId, BTreeSet<DependencyEdge>> {
        self.by_project
    }
}
