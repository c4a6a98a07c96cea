//! Read-only workspace snapshot import.
//!
//! A snapshot is a JSON description of a workspace: its projects, how they
//! reference each other, which artifacts they declare and the local dependency
//! edges of each project. It feeds [`InMemoryWorkspace`]; nothing is ever
//! written back.

use crate::adapters::memory::InMemoryWorkspace;
use crate::domain::edge::DependencyEdge;
use crate::domain::identity::{ObjectIdentity, ProjectId};
use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: ProjectId,
    /// Projects this one references directly.
    #[serde(default)]
    pub references: Vec<ProjectId>,
    #[serde(default = "default_true")]
    pub buildable: bool,
    /// False when the project's dependency index is unavailable.
    #[serde(default = "default_true")]
    pub indexed: bool,
    #[serde(default)]
    pub artifacts: Vec<ArtifactEntry>,
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    #[serde(flatten)]
    pub identity: ObjectIdentity,
    /// Owning enum type, for enum content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<ObjectIdentity>,
}

fn default_true() -> bool {
    true
}

impl WorkspaceSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the in-memory workspace, validating project names and references.
    pub fn into_workspace(self, allow_reference_cycles: bool) -> Result<InMemoryWorkspace> {
        let mut names = HashSet::new();
        for project in &self.projects {
            if !names.insert(project.name.clone()) {
                bail!("Duplicate project in snapshot: {}", project.name);
            }
        }

        let mut workspace = InMemoryWorkspace::new();
        for project in &self.projects {
            if project.indexed {
                workspace.add_project(project.name.clone());
            } else {
                if !project.edges.is_empty() {
                    bail!(
                        "Project {} is not indexed but lists {} edges",
                        project.name,
                        project.edges.len()
                    );
                }
                workspace.add_unindexed_project(project.name.clone());
            }
            workspace.set_buildable(&project.name, project.buildable);
        }

        for project in self.projects {
            for referenced in &project.references {
                if !names.contains(referenced) {
                    bail!(
                        "Project {} references unknown project {}",
                        project.name,
                        referenced
                    );
                }
                workspace.add_reference(&project.name, referenced);
            }
            for artifact in project.artifacts {
                workspace.add_artifact(&project.name, artifact.identity, artifact.enum_type);
            }
            for edge in project.edges {
                workspace.add_edge(&project.name, edge);
            }
        }

        if !allow_reference_cycles {
            workspace.topology().check_acyclic()?;
        }
        Ok(workspace)
    }
}
