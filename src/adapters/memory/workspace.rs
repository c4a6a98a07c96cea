use crate::adapters::memory::graph::PetgraphDependencyGraph;
use crate::adapters::memory::topology::StaticTopology;
use crate::domain::edge::DependencyEdge;
use crate::domain::identity::{Artifact, ObjectIdentity, ProjectId};
use crate::domain::ports::{
    DependencyGraph, GraphProvider, KindReduction, ObjectResolver, ProjectTopology,
};
use crate::domain::session::ResolverContext;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

/// Whole workspace held in memory: topology, per-project graphs and artifacts.
#[derive(Debug, Default)]
pub struct InMemoryWorkspace {
    topology: StaticTopology,
    graphs: HashMap<ProjectId, PetgraphDependencyGraph>,
    artifacts: HashMap<ProjectId, HashMap<ObjectIdentity, Artifact>>,
    owners: HashMap<ObjectIdentity, BTreeSet<ProjectId>>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project with an empty dependency graph.
    pub fn add_project(&mut self, project: ProjectId) {
        self.topology.add_project(project.clone());
        self.graphs.entry(project).or_default();
    }

    /// Register a project whose dependency index is unavailable.
    pub fn add_unindexed_project(&mut self, project: ProjectId) {
        self.graphs.remove(&project);
        self.topology.add_project(project);
    }

    /// Records that `from` references `to`; unknown projects are registered.
    pub fn add_reference(&mut self, from: &ProjectId, to: &ProjectId) {
        for project in [from, to] {
            if !self.topology.contains(project) {
                self.add_project(project.clone());
            }
        }
        self.topology.add_reference(from, to);
    }

    pub fn set_buildable(&mut self, project: &ProjectId, buildable: bool) {
        self.topology.set_buildable(project, buildable);
    }

    /// Adds the edge to the project's local graph, creating the project if needed.
    pub fn add_edge(&mut self, project: &ProjectId, edge: DependencyEdge) -> bool {
        if !self.topology.contains(project) {
            self.add_project(project.clone());
        }
        match self.graphs.get_mut(project) {
            Some(graph) => graph.add_edge(&edge),
            None => false,
        }
    }

    pub fn add_artifact(
        &mut self,
        project: &ProjectId,
        identity: ObjectIdentity,
        enum_type: Option<ObjectIdentity>,
    ) {
        if !self.topology.contains(project) {
            self.add_project(project.clone());
        }
        self.owners
            .entry(identity.clone())
            .or_default()
            .insert(project.clone());
        self.artifacts.entry(project.clone()).or_default().insert(
            identity.clone(),
            Artifact {
                identity,
                project: project.clone(),
                enum_type,
            },
        );
    }

    pub fn topology(&self) -> &StaticTopology {
        &self.topology
    }

    pub fn project_graph(&self, project: &ProjectId) -> Option<&PetgraphDependencyGraph> {
        self.graphs.get(project)
    }

    pub fn projects(&self) -> Vec<ProjectId> {
        self.topology.projects()
    }

    pub fn edge_count(&self) -> usize {
        self.graphs.values().map(|g| g.edge_count()).sum()
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.values().map(HashMap::len).sum()
    }

    /// Identities (declared artifacts and graph nodes) whose qualified name matches.
    pub fn search(&self, pattern: &Regex) -> Vec<(ProjectId, ObjectIdentity)> {
        let mut hits = BTreeSet::new();
        for (project, artifacts) in &self.artifacts {
            for identity in artifacts.keys() {
                if pattern.is_match(&identity.qualified_name) {
                    hits.insert((project.clone(), identity.clone()));
                }
            }
        }
        for (project, graph) in &self.graphs {
            for identity in graph.identities() {
                if pattern.is_match(&identity.qualified_name) {
                    hits.insert((project.clone(), identity.clone()));
                }
            }
        }
        hits.into_iter().collect()
    }

    /// Resolver context over this workspace with the default bridges.
    pub fn context<'a>(&'a self, reduction: &'a dyn KindReduction) -> ResolverContext<'a> {
        ResolverContext::new(self, &self.topology, self, reduction)
    }

    fn artifact_in(&self, project: &ProjectId, identity: &ObjectIdentity) -> Option<&Artifact> {
        self.artifacts.get(project)?.get(identity)
    }
}

impl GraphProvider for InMemoryWorkspace {
    fn graph(&self, project: &ProjectId) -> Option<&dyn DependencyGraph> {
        self.graphs
            .get(project)
            .map(|g| g as &dyn DependencyGraph)
    }
}

impl ObjectResolver for InMemoryWorkspace {
    fn find_object(&self, identity: &ObjectIdentity, project: &ProjectId) -> Option<Artifact> {
        if let Some(artifact) = self.artifact_in(project, identity) {
            return Some(artifact.clone());
        }
        let owner = self.owners.get(identity)?.iter().next()?;
        self.artifact_in(owner, identity).cloned()
    }

    fn find_enum_type(
        &self,
        artifact: &Artifact,
        project: &ProjectId,
    ) -> Option<(ObjectIdentity, ProjectId)> {
        let enum_type = artifact.enum_type.as_ref()?;
        let owners = self.owners.get(enum_type)?;

        // Prefer the content's own project, then the asking project, then
        // whatever the content's project references.
        let owner = [&artifact.project, project]
            .into_iter()
            .find(|p| owners.contains(*p))
            .or_else(|| {
                owners
                    .iter()
                    .find(|o| self.topology.is_referencing(&artifact.project, o))
            })
            .or_else(|| owners.iter().next())?;
        Some((enum_type.clone(), owner.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::edge::DependencyKind;
    use crate::domain::identity::ArtifactKind;

    fn p(name: &str) -> ProjectId {
        ProjectId::new(name)
    }

    fn enum_workspace() -> InMemoryWorkspace {
        let mut ws = InMemoryWorkspace::new();
        let color = ObjectIdentity::new("Color", ArtifactKind::EnumType);
        ws.add_artifact(&p("types"), color.clone(), None);
        ws.add_artifact(
            &p("app"),
            ObjectIdentity::new("Color.RED", ArtifactKind::EnumContent),
            Some(color),
        );
        ws.add_reference(&p("app"), &p("types"));
        ws
    }

    #[test]
    fn test_find_object_prefers_project_then_any() {
        let ws = enum_workspace();
        let red = ObjectIdentity::new("Color.RED", ArtifactKind::EnumContent);
        assert_eq!(ws.find_object(&red, &p("app")).unwrap().project, p("app"));
        assert_eq!(ws.find_object(&red, &p("types")).unwrap().project, p("app"));
        let missing = ObjectIdentity::new("Nope", ArtifactKind::Type);
        assert!(ws.find_object(&missing, &p("app")).is_none());
    }

    #[test]
    fn test_find_enum_type_owner() {
        let ws = enum_workspace();
        let red = ObjectIdentity::new("Color.RED", ArtifactKind::EnumContent);
        let artifact = ws.find_object(&red, &p("app")).unwrap();
        let (ty, owner) = ws.find_enum_type(&artifact, &p("app")).unwrap();
        assert_eq!(ty.qualified_name, "Color");
        assert_eq!(owner, p("types"));
    }

    #[test]
    fn test_unindexed_project_has_no_graph() {
        let mut ws = InMemoryWorkspace::new();
        ws.add_unindexed_project(p("closed"));
        assert!(ws.graph(&p("closed")).is_none());
        assert!(ws.topology().can_be_built(&p("closed")));
        assert!(!ws.add_edge(
            &p("closed"),
            DependencyEdge::new(
                ObjectIdentity::new("a", ArtifactKind::Type),
                ObjectIdentity::new("b", ArtifactKind::Type),
                DependencyKind::Reference,
            ),
        ));
    }

    #[test]
    fn test_search_by_pattern() {
        let ws = enum_workspace();
        let hits = ws.search(&Regex::new("^Color").unwrap());
        assert_eq!(hits.len(), 2);
        assert_eq!(ws.search(&Regex::new("RED$").unwrap()).len(), 1);
    }
}
