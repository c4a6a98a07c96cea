use crate::domain::edge::{DependencyKind, KindSet};
use crate::domain::identity::ProjectId;
use crate::domain::ports::KindReduction;
use anyhow::Result;

/// Per-kind rules from [`DependencyKind::reduce`]; identical in every project.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardReduction;

impl KindReduction for StandardReduction {
    fn reduce(
        &self,
        kind: DependencyKind,
        allowed: &KindSet,
        _project: &ProjectId,
    ) -> Result<KindSet> {
        Ok(kind.reduce(*allowed))
    }
}
