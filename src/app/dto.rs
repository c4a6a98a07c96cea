use crate::domain::edge::DependencyEdge;
use crate::domain::identity::ObjectIdentity;
use anyhow::Result;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which kind reduction drives transitive propagation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ReductionKind {
    #[default]
    Standard,
    Transitive,
    Direct,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub snapshot_path: String,
    pub project_count: usize,
    pub edge_count: usize,
    pub artifact_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdentityDto {
    pub qualified_name: String,
    /// type | enum_type | enum_content | member | function | variable | module | other
    pub kind: String,
}

impl IdentityDto {
    pub fn to_identity(&self) -> Result<ObjectIdentity> {
        Ok(ObjectIdentity::new(
            self.qualified_name.clone(),
            self.kind.parse()?,
        ))
    }
}

impl From<&ObjectIdentity> for IdentityDto {
    fn from(identity: &ObjectIdentity) -> Self {
        Self {
            qualified_name: identity.qualified_name.clone(),
            kind: identity.kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollectRequest {
    /// Project on whose behalf the build was requested.
    pub reference_project: String,
    #[serde(default)]
    pub added_or_changed: Vec<IdentityDto>,
    #[serde(default)]
    pub removed: Vec<IdentityDto>,
    #[serde(default)]
    pub reduction: ReductionKind,
    /// Caps traversal nesting for this request; unlimited when absent.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollectResponse {
    pub reference_project: String,
    pub project_count: usize,
    pub edge_count: usize,
    pub projects: Vec<ProjectEdges>,
    /// Leaf projects to hand to the build orchestrator.
    pub build_roots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectEdges {
    pub project: String,
    /// Stale artifacts: sources of the recorded edges, deduplicated.
    pub stale: Vec<IdentityDto>,
    pub edges: Vec<EdgeDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeDto {
    pub source: IdentityDto,
    pub target: IdentityDto,
    pub kind: String,
}

impl From<&DependencyEdge> for EdgeDto {
    fn from(edge: &DependencyEdge) -> Self {
        Self {
            source: (&edge.source).into(),
            target: (&edge.target).into(),
            kind: edge.kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectInfo {
    pub name: String,
    pub references: Vec<String>,
    pub referenced_by: Vec<String>,
    pub buildable: bool,
    pub indexed: bool,
    pub edge_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub pattern: String,
    pub total_matches: usize,
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    pub project: String,
    pub identity: IdentityDto,
}
