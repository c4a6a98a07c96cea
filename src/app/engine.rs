use crate::adapters::memory::InMemoryWorkspace;
use crate::adapters::reduction::{DirectReduction, StandardReduction, TransitiveReduction};
use crate::adapters::snapshot::WorkspaceSnapshot;
use crate::app::dto::*;
use crate::app::error::RequestError;
use crate::domain::identity::{ObjectIdentity, ProjectId};
use crate::domain::ports::{GraphProvider, KindReduction, ProjectTopology};
use crate::domain::session::{ResolverConfig, collect_dependencies_for_incremental_build};
use anyhow::{Context as _, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Clone)]
pub struct StaleEngine {
    inner: Arc<RwLock<EngineData>>,
}

struct EngineData {
    snapshot_path: PathBuf,
    allow_reference_cycles: bool,
    config: ResolverConfig,
    workspace: Arc<InMemoryWorkspace>,
}

impl StaleEngine {
    /// Construct an engine from an already-built workspace.
    ///
    /// Used for testing or when the workspace is assembled by another collaborator.
    pub fn from_workspace(
        snapshot_path: PathBuf,
        workspace: InMemoryWorkspace,
        config: ResolverConfig,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(EngineData {
                snapshot_path,
                allow_reference_cycles: false,
                config,
                workspace: Arc::new(workspace),
            })),
        }
    }

    pub fn load_from_json(
        json_path: &Path,
        allow_reference_cycles: bool,
        config: ResolverConfig,
    ) -> Result<Self> {
        let workspace = load_workspace(json_path, allow_reference_cycles)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(EngineData {
                snapshot_path: json_path.to_path_buf(),
                allow_reference_cycles,
                config,
                workspace: Arc::new(workspace),
            })),
        })
    }

    pub fn reload(&self) -> Result<HealthResponse> {
        let (path, allow_cycles) = {
            let data = self.inner.read().unwrap();
            (data.snapshot_path.clone(), data.allow_reference_cycles)
        };
        let workspace = load_workspace(&path, allow_cycles)?;

        let mut data = self.inner.write().unwrap();
        data.workspace = Arc::new(workspace);
        Ok(health_of(&data))
    }

    pub fn health(&self) -> HealthResponse {
        let data = self.inner.read().unwrap();
        health_of(&data)
    }

    pub fn projects(&self) -> ProjectsResponse {
        let data = self.inner.read().unwrap();
        let ws = data.workspace.as_ref();
        let topology = ws.topology();

        let projects = ws
            .projects()
            .into_iter()
            .map(|project| ProjectInfo {
                name: project.to_string(),
                references: names(topology.references_of(&project)),
                referenced_by: names(topology.find_referencing_projects(&project, true)),
                buildable: topology.can_be_built(&project),
                indexed: ws.graph(&project).is_some(),
                edge_count: ws.project_graph(&project).map_or(0, |g| g.edge_count()),
            })
            .collect();
        ProjectsResponse { projects }
    }

    pub fn search(&self, pattern: &str, limit: Option<usize>) -> Result<SearchResponse> {
        let regex = Regex::new(pattern).map_err(|source| RequestError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let data = self.inner.read().unwrap();
        let hits = data.workspace.search(&regex);
        let total_matches = hits.len();

        let items = hits
            .iter()
            .take(limit.unwrap_or(total_matches))
            .map(|(project, identity)| SearchItem {
                project: project.to_string(),
                identity: identity.into(),
            })
            .collect();
        Ok(SearchResponse {
            pattern: pattern.to_string(),
            total_matches,
            items,
        })
    }

    pub fn collect(&self, req: CollectRequest) -> Result<CollectResponse> {
        let data = self.inner.read().unwrap();
        let ws = data.workspace.as_ref();

        let reference = ProjectId::new(req.reference_project.as_str());
        if !ws.topology().contains(&reference) {
            return Err(RequestError::UnknownProject(req.reference_project).into());
        }
        let added_or_changed = parse_identities(&req.added_or_changed)?;
        let removed = parse_identities(&req.removed)?;

        let mut config = data.config.clone();
        if let Some(max_depth) = req.max_depth {
            config.max_depth = Some(max_depth);
        }

        let ctx = ws.context(reduction_for(req.reduction));
        let collected = collect_dependencies_for_incremental_build(
            &ctx,
            reference.clone(),
            &added_or_changed,
            &removed,
            config,
        )
        .with_context(|| format!("Failed to collect stale dependencies for {reference}"))?;

        let mut build_roots = BTreeSet::new();
        let projects: Vec<ProjectEdges> = collected
            .iter()
            .map(|(project, edges)| {
                build_roots.extend(
                    ws.topology()
                        .find_referencing_project_leaves_or_self(project),
                );
                let stale: BTreeSet<&ObjectIdentity> = edges.iter().map(|e| &e.source).collect();
                ProjectEdges {
                    project: project.to_string(),
                    stale: stale.into_iter().map(IdentityDto::from).collect(),
                    edges: edges.iter().map(EdgeDto::from).collect(),
                }
            })
            .collect();

        info!(
            reference = %reference,
            projects = projects.len(),
            edges = collected.edge_count(),
            "stale set computed"
        );

        Ok(CollectResponse {
            reference_project: req.reference_project,
            project_count: projects.len(),
            edge_count: collected.edge_count(),
            projects,
            build_roots: names(build_roots),
        })
    }
}

fn load_workspace(json_path: &Path, allow_reference_cycles: bool) -> Result<InMemoryWorkspace> {
    WorkspaceSnapshot::load(json_path)?
        .into_workspace(allow_reference_cycles)
        .with_context(|| format!("Invalid workspace snapshot: {}", json_path.display()))
}

fn health_of(data: &EngineData) -> HealthResponse {
    HealthResponse {
        snapshot_path: data.snapshot_path.to_string_lossy().to_string(),
        project_count: data.workspace.projects().len(),
        edge_count: data.workspace.edge_count(),
        artifact_count: data.workspace.artifact_count(),
    }
}

fn reduction_for(kind: ReductionKind) -> &'static dyn KindReduction {
    match kind {
        ReductionKind::Standard => &StandardReduction,
        ReductionKind::Transitive => &TransitiveReduction,
        ReductionKind::Direct => &DirectReduction,
    }
}

fn parse_identities(dtos: &[IdentityDto]) -> Result<Vec<ObjectIdentity>, RequestError> {
    dtos.iter()
        .map(|dto| {
            dto.to_identity().map_err(|e| RequestError::BadIdentity {
                name: dto.qualified_name.clone(),
                reason: format!("{e:#}"),
            })
        })
        .collect()
}

fn names(projects: impl IntoIterator<Item = ProjectId>) -> Vec<String> {
    projects.into_iter().map(|p| p.to_string()).collect()
}
