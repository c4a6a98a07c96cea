use crate::domain::edge::{DependencyEdge, DependencyKind, KindSet};
use crate::domain::identity::{Artifact, ObjectIdentity, ProjectId};
use anyhow::Result;

/// Per-project reverse dependency index (implemented by Infrastructure)
pub trait DependencyGraph {
    /// All local edges whose target equals `target`. May be empty.
    fn dependants(&self, target: &ObjectIdentity) -> Result<Vec<DependencyEdge>>;
}

/// Looks up the local dependency graph of a project, if one is available
pub trait GraphProvider {
    fn graph(&self, project: &ProjectId) -> Option<&dyn DependencyGraph>;
}

/// Project reference topology port
pub trait ProjectTopology {
    fn can_be_built(&self, project: &ProjectId) -> bool;

    /// True if `project` references `other` directly or transitively.
    fn is_referencing(&self, project: &ProjectId, other: &ProjectId) -> bool;

    /// Projects referencing `project`; only direct referrers when `direct_only`.
    fn find_referencing_projects(&self, project: &ProjectId, direct_only: bool) -> Vec<ProjectId>;

    /// Leaf projects (nobody references them) that reference `project`,
    /// or `project` itself when nothing references it.
    fn find_referencing_project_leaves_or_self(&self, project: &ProjectId) -> Vec<ProjectId>;
}

/// Object resolution port, used by identity bridges
pub trait ObjectResolver {
    fn find_object(&self, identity: &ObjectIdentity, project: &ProjectId) -> Option<Artifact>;

    /// Enum type that `artifact` belongs to, with the project owning that type.
    fn find_enum_type(
        &self,
        artifact: &Artifact,
        project: &ProjectId,
    ) -> Option<(ObjectIdentity, ProjectId)>;
}

/// Dependency kind reduction port
pub trait KindReduction {
    /// Allowed kinds for the chain segment after following an edge of `kind`.
    fn reduce(&self, kind: DependencyKind, allowed: &KindSet, project: &ProjectId)
    -> Result<KindSet>;
}
