use crate::domain::edge::{DependencyKind, KindSet};
use crate::domain::identity::ProjectId;
use crate::domain::ports::KindReduction;
use anyhow::Result;

/// Full transitive closure: every chain keeps its allowed kinds
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitiveReduction;

impl KindReduction for TransitiveReduction {
    fn reduce(
        &self,
        _kind: DependencyKind,
        allowed: &KindSet,
        _project: &ProjectId,
    ) -> Result<KindSet> {
        Ok(*allowed)
    }
}
