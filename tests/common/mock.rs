//! Mock collaborators for integration tests.
#![allow(dead_code)]

use std::cell::Cell;

use anyhow::{Result, anyhow};
use stale_scope::domain::edge::{DependencyEdge, DependencyKind, KindSet};
use stale_scope::domain::identity::{ObjectIdentity, ProjectId};
use stale_scope::domain::ports::{DependencyGraph, GraphProvider, KindReduction};

/// Graph whose lookups always fail.
pub struct FailingGraph;

impl DependencyGraph for FailingGraph {
    fn dependants(&self, target: &ObjectIdentity) -> Result<Vec<DependencyEdge>> {
        Err(anyhow!("index unavailable for {target}"))
    }
}

/// Provides the same failing graph for every project.
pub struct FailingGraphs;

impl GraphProvider for FailingGraphs {
    fn graph(&self, _project: &ProjectId) -> Option<&dyn DependencyGraph> {
        Some(&FailingGraph)
    }
}

/// Standard reduction that counts how often it is consulted.
#[derive(Default)]
pub struct CountingReduction {
    pub calls: Cell<usize>,
}

impl KindReduction for CountingReduction {
    fn reduce(&self, kind: DependencyKind, allowed: &KindSet, _: &ProjectId) -> Result<KindSet> {
        self.calls.set(self.calls.get() + 1);
        Ok(kind.reduce(*allowed))
    }
}
