use crate::domain::edge::{DependencyKind, KindSet};
use crate::domain::identity::ProjectId;
use crate::domain::ports::KindReduction;
use anyhow::Result;

/// Direct dependents only; no chain continues past the first hop
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectReduction;

impl KindReduction for DirectReduction {
    fn reduce(
        &self,
        _kind: DependencyKind,
        _allowed: &KindSet,
        _project: &ProjectId,
    ) -> Result<KindSet> {
        Ok(KindSet::empty())
    }
}
