use crate::domain::bridge::{EnumContentBridge, IdentityBridge};
use crate::domain::edge::{DependencyEdge, KindSet};
use crate::domain::identity::{ObjectIdentity, ProjectId};
use crate::domain::ports::{GraphProvider, KindReduction, ObjectResolver, ProjectTopology};
use crate::domain::result::CollectedDependencies;
use anyhow::{Context as _, Result, bail};
use std::collections::HashSet;
use std::vec;
use tracing::{debug, trace};

/// Resolver tuning
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// Optional cap on the nesting of transitive hops, fan-outs and bridges.
    /// Unlimited when `None`; exceeding the cap aborts the session.
    pub max_depth: Option<usize>,
}

/// Collaborators a resolution session reads from
pub struct ResolverContext<'a> {
    pub graphs: &'a dyn GraphProvider,
    pub topology: &'a dyn ProjectTopology,
    pub resolver: &'a dyn ObjectResolver,
    pub reduction: &'a dyn KindReduction,
    pub bridges: Vec<Box<dyn IdentityBridge>>,
}

impl<'a> ResolverContext<'a> {
    /// Context with the enum content bridge installed.
    pub fn new(
        graphs: &'a dyn GraphProvider,
        topology: &'a dyn ProjectTopology,
        resolver: &'a dyn ObjectResolver,
        reduction: &'a dyn KindReduction,
    ) -> Self {
        Self {
            graphs,
            topology,
            resolver,
            reduction,
            bridges: vec![Box::new(EnumContentBridge)],
        }
    }

    pub fn with_bridge(mut self, bridge: Box<dyn IdentityBridge>) -> Self {
        self.bridges.push(bridge);
        self
    }

    pub fn without_bridges(mut self) -> Self {
        self.bridges.clear();
        self
    }
}

/// One end-to-end stale-set computation on behalf of a reference project.
///
/// The session owns the result map; every nested traversal (transitive hops,
/// project fan-out, bridges) runs through `&mut self` and therefore shares it.
pub struct ResolutionSession<'a> {
    ctx: &'a ResolverContext<'a>,
    config: ResolverConfig,
    reference_project: ProjectId,
    collected: CollectedDependencies,
    /// Edges already followed in projects whose edges are not recorded.
    propagated: HashSet<(ProjectId, DependencyEdge, KindSet)>,
}

impl<'a> ResolutionSession<'a> {
    pub fn new(ctx: &'a ResolverContext<'a>, reference_project: ProjectId) -> Self {
        Self::with_config(ctx, reference_project, ResolverConfig::default())
    }

    pub fn with_config(
        ctx: &'a ResolverContext<'a>,
        reference_project: ProjectId,
        config: ResolverConfig,
    ) -> Self {
        Self {
            ctx,
            config,
            reference_project,
            collected: CollectedDependencies::new(),
            propagated: HashSet::new(),
        }
    }

    pub fn reference_project(&self) -> &ProjectId {
        &self.reference_project
    }

    /// Seed one traversal per identity, with every dependency kind allowed.
    pub fn collect_for_incremental_build(
        &mut self,
        added_or_changed: &[ObjectIdentity],
        removed: &[ObjectIdentity],
    ) -> Result<&CollectedDependencies> {
        for root in added_or_changed.iter().chain(removed) {
            let mut visited = HashSet::new();
            self.collect_dependencies(root, &mut visited, KindSet::all())?;
        }
        debug!(
            reference = %self.reference_project,
            roots = added_or_changed.len() + removed.len(),
            projects = self.collected.projects().count(),
            edges = self.collected.edge_count(),
            "collected stale dependencies"
        );
        Ok(&self.collected)
    }

    /// Collect everything that transitively depends on `root`, starting in the
    /// reference project.
    pub fn collect_dependencies(
        &mut self,
        root: &ObjectIdentity,
        visited_projects: &mut HashSet<ProjectId>,
        allowed: KindSet,
    ) -> Result<()> {
        let project = self.reference_project.clone();
        self.collect_in_project(&project, root, visited_projects, allowed)
    }

    pub fn collected_dependencies(&self) -> &CollectedDependencies {
        &self.collected
    }

    pub fn into_collected(self) -> CollectedDependencies {
        self.collected
    }

    /// Depth-first traversal over an explicit frame stack.
    ///
    /// `visited_projects` is shared by the root frame and its fan-out frames;
    /// every transitive hop and bridge starts a fresh set.
    fn collect_in_project(
        &mut self,
        project: &ProjectId,
        root: &ObjectIdentity,
        visited_projects: &mut HashSet<ProjectId>,
        allowed: KindSet,
    ) -> Result<()> {
        // Visited sets live on their own stack; a frame owning one pops it when done
        let mut visited_sets = vec![std::mem::take(visited_projects)];
        let mut stack = vec![Frame::enter(project.clone(), root.clone(), allowed, 0, 0, false)];

        let mut outcome = Ok(());
        while let Some(frame) = stack.last_mut() {
            match self.advance(frame, &mut visited_sets) {
                Ok(Some(child)) => stack.push(child),
                Ok(None) => {
                    if let Some(done) = stack.pop()
                        && done.owns_visited
                    {
                        visited_sets.pop();
                    }
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        *visited_projects = visited_sets.swap_remove(0);
        outcome
    }

    /// Runs `frame` until it needs a child frame (returned) or is finished (`None`).
    fn advance(
        &mut self,
        frame: &mut Frame,
        visited_sets: &mut Vec<HashSet<ProjectId>>,
    ) -> Result<Option<Frame>> {
        let ctx = self.ctx;
        loop {
            match &mut frame.step {
                Step::Enter => {
                    if let Some(max_depth) = self.config.max_depth
                        && frame.depth > max_depth
                    {
                        bail!(
                            "dependency traversal exceeded max depth {} at {} in project {}",
                            max_depth,
                            frame.root,
                            frame.project
                        );
                    }
                    if ctx.graphs.graph(&frame.project).is_none() {
                        debug!(project = %frame.project, "no dependency graph, skipping");
                        return Ok(None);
                    }
                    if !ctx.topology.can_be_built(&frame.project) {
                        debug!(project = %frame.project, "project cannot be built, skipping");
                        return Ok(None);
                    }
                    frame.step = Step::Bridges(0);
                }

                // 1. Bridges: traverse from the rewritten identity in its own project
                Step::Bridges(next) => {
                    let Some(bridge) = ctx.bridges.get(*next) else {
                        frame.step = self.dependants_step(&frame.project, &frame.root)?;
                        continue;
                    };
                    *next += 1;
                    if let Some(target) =
                        bridge.bridge(&frame.root, &frame.project, &frame.allowed, ctx.resolver)
                    {
                        trace!(from = %frame.root, to = %target.identity, project = %target.project, "bridging");
                        visited_sets.push(HashSet::new());
                        return Ok(Some(Frame::enter(
                            target.project,
                            target.identity,
                            frame.allowed,
                            frame.depth + 1,
                            visited_sets.len() - 1,
                            true,
                        )));
                    }
                }

                // 2. Local direct dependents, followed transitively
                Step::Dependants { edges, in_scope } => {
                    let Some(edge) = edges.next() else {
                        visited_sets[frame.visited].insert(frame.project.clone());
                        let referencing = ctx.topology.find_referencing_projects(&frame.project, true);
                        frame.step = Step::FanOut(referencing.into_iter());
                        continue;
                    };
                    let project = &frame.project;
                    let allowed = frame.allowed;
                    if self.collected.contains(project, &edge) || !allowed.contains(edge.kind) {
                        continue;
                    }
                    if *in_scope {
                        trace!(%project, %edge, "stale");
                        self.collected.record(project, edge.clone());
                    } else if !self
                        .propagated
                        .insert((project.clone(), edge.clone(), allowed))
                    {
                        continue;
                    }

                    let next = ctx
                        .reduction
                        .reduce(edge.kind, &allowed, project)
                        .with_context(|| format!("Failed to reduce kinds after {edge} in {project}"))?
                        .intersection(allowed);
                    if next.is_empty() {
                        continue;
                    }
                    // New chain through a different node: projects may be revisited
                    visited_sets.push(HashSet::new());
                    return Ok(Some(Frame::enter(
                        project.clone(),
                        edge.source,
                        next,
                        frame.depth + 1,
                        visited_sets.len() - 1,
                        true,
                    )));
                }

                // 3. Fan out to related projects that reference this one
                Step::FanOut(referencing) => {
                    let Some(next) = referencing.next() else {
                        return Ok(None);
                    };
                    if visited_sets[frame.visited].contains(&next) || !self.is_related(&next) {
                        continue;
                    }
                    trace!(from = %frame.project, to = %next, root = %frame.root, "fan-out");
                    return Ok(Some(Frame::enter(
                        next,
                        frame.root.clone(),
                        frame.allowed,
                        frame.depth + 1,
                        frame.visited,
                        false,
                    )));
                }
            }
        }
    }

    fn dependants_step(&self, project: &ProjectId, root: &ObjectIdentity) -> Result<Step> {
        let ctx = self.ctx;
        let Some(graph) = ctx.graphs.graph(project) else {
            return Ok(Step::FanOut(Vec::new().into_iter()));
        };
        let edges = graph
            .dependants(root)
            .with_context(|| format!("Failed to look up dependants of {root} in {project}"))?;
        let in_scope = *project == self.reference_project
            || ctx.topology.is_referencing(project, &self.reference_project);
        Ok(Step::Dependants {
            edges: edges.into_iter(),
            in_scope,
        })
    }

    fn is_related(&self, project: &ProjectId) -> bool {
        let topology = self.ctx.topology;
        *project == self.reference_project
            || topology.is_referencing(&self.reference_project, project)
            || topology.is_referencing(project, &self.reference_project)
    }
}

/// Where a suspended frame resumes
enum Step {
    Enter,
    Bridges(usize),
    Dependants {
        edges: vec::IntoIter<DependencyEdge>,
        in_scope: bool,
    },
    FanOut(vec::IntoIter<ProjectId>),
}

/// One pending `(project, root, allowed)` visit.
struct Frame {
    project: ProjectId,
    root: ObjectIdentity,
    allowed: KindSet,
    depth: usize,
    /// Index of this frame's visited-project set
    visited: usize,
    owns_visited: bool,
    step: Step,
}

impl Frame {
    fn enter(
        project: ProjectId,
        root: ObjectIdentity,
        allowed: KindSet,
        depth: usize,
        visited: usize,
        owns_visited: bool,
    ) -> Self {
        Self {
            project,
            root,
            allowed,
            depth,
            visited,
            owns_visited,
            step: Step::Enter,
        }
    }
}

/// Run a whole session for one batch of changed and removed identities.
pub fn collect_dependencies_for_incremental_build(
    ctx: &ResolverContext<'_>,
    reference_project: ProjectId,
    added_or_changed: &[ObjectIdentity],
    removed: &[ObjectIdentity],
    config: ResolverConfig,
) -> Result<CollectedDependencies> {
    let mut session = ResolutionSession::with_config(ctx, reference_project, config);
    session.collect_for_incremental_build(added_or_changed, removed)?;
    Ok(session.into_collected())
}
