use crate::domain::identity::ProjectId;
use crate::domain::ports::ProjectTopology;
use anyhow::{Result, bail};
use petgraph::Direction;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use std::collections::{HashMap, HashSet};

/// Project reference topology held in memory.
///
/// An edge `A -> B` means project A references (depends on) project B.
#[derive(Debug, Default)]
pub struct StaticTopology {
    graph: DiGraph<ProjectId, ()>,
    project_to_node: HashMap<ProjectId, NodeIndex>,
    unbuildable: HashSet<ProjectId>,
}

impl StaticTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&mut self, project: ProjectId) -> NodeIndex {
        if let Some(&idx) = self.project_to_node.get(&project) {
            return idx;
        }
        let idx = self.graph.add_node(project.clone());
        self.project_to_node.insert(project, idx);
        idx
    }

    pub fn add_reference(&mut self, from: &ProjectId, to: &ProjectId) {
        let a = self.add_project(from.clone());
        let b = self.add_project(to.clone());
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    pub fn set_buildable(&mut self, project: &ProjectId, buildable: bool) {
        if buildable {
            self.unbuildable.remove(project);
        } else {
            self.unbuildable.insert(project.clone());
        }
    }

    pub fn contains(&self, project: &ProjectId) -> bool {
        self.project_to_node.contains_key(project)
    }

    /// Projects in name order
    pub fn projects(&self) -> Vec<ProjectId> {
        let mut projects: Vec<_> = self.graph.node_weights().cloned().collect();
        projects.sort();
        projects
    }

    /// Projects `project` references directly, in name order
    pub fn references_of(&self, project: &ProjectId) -> Vec<ProjectId> {
        self.neighbors_sorted(project, Direction::Outgoing)
    }

    /// Fails if the reference graph contains a cycle.
    pub fn check_acyclic(&self) -> Result<()> {
        if let Err(cycle) = toposort(&self.graph, None) {
            bail!(
                "Project reference cycle detected through project {}",
                self.graph[cycle.node_id()]
            );
        }
        Ok(())
    }

    fn neighbors_sorted(&self, project: &ProjectId, direction: Direction) -> Vec<ProjectId> {
        let Some(&idx) = self.project_to_node.get(project) else {
            return Vec::new();
        };
        let mut out: Vec<_> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

impl ProjectTopology for StaticTopology {
    fn can_be_built(&self, project: &ProjectId) -> bool {
        self.contains(project) && !self.unbuildable.contains(project)
    }

    fn is_referencing(&self, project: &ProjectId, other: &ProjectId) -> bool {
        if project == other {
            return false;
        }
        match (
            self.project_to_node.get(project),
            self.project_to_node.get(other),
        ) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    fn find_referencing_projects(&self, project: &ProjectId, direct_only: bool) -> Vec<ProjectId> {
        if direct_only {
            return self.neighbors_sorted(project, Direction::Incoming);
        }
        let Some(&start) = self.project_to_node.get(project) else {
            return Vec::new();
        };
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut out = Vec::new();
        while let Some(idx) = dfs.next(reversed) {
            if idx != start {
                out.push(self.graph[idx].clone());
            }
        }
        out.sort();
        out
    }

    fn find_referencing_project_leaves_or_self(&self, project: &ProjectId) -> Vec<ProjectId> {
        let leaves: Vec<_> = self
            .find_referencing_projects(project, false)
            .into_iter()
            .filter(|p| self.find_referencing_projects(p, true).is_empty())
            .collect();
        if leaves.is_empty() {
            vec![project.clone()]
        } else {
            leaves
        }
    }
}
