//! End-to-end stale-set scenarios over the in-memory workspace.

mod common;

use std::collections::{BTreeSet, HashSet};

use common::fixtures::*;
use stale_scope::adapters::reduction::{DirectReduction, StandardReduction, TransitiveReduction};
use stale_scope::domain::edge::{DependencyEdge, DependencyKind, KindSet};
use stale_scope::domain::identity::{ArtifactKind, ObjectIdentity};
use stale_scope::domain::result::CollectedDependencies;
use stale_scope::domain::session::{
    ResolutionSession, ResolverConfig, ResolverContext, collect_dependencies_for_incremental_build,
};

fn edges_of(result: &CollectedDependencies, project: &str) -> BTreeSet<DependencyEdge> {
    result.edges(&p(project)).cloned().unwrap_or_default()
}

#[test]
fn test_single_project_chain_is_collected_transitively() {
    let ws = chain_workspace();
    let ctx = ws.context(&StandardReduction);
    let result = collect_dependencies_for_incremental_build(
        &ctx,
        p("lib"),
        &[ty("Z")],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();

    let expected: BTreeSet<_> = [
        edge("Y", "Z", DependencyKind::Subtype),
        edge("X", "Y", DependencyKind::Subtype),
    ]
    .into_iter()
    .collect();
    assert_eq!(edges_of(&result, "lib"), expected);
    assert_eq!(result.projects().count(), 1);
}

#[test]
fn test_edges_outside_reference_scope_are_not_recorded() {
    let ws = two_project_workspace();
    let ctx = ws.context(&StandardReduction);

    // Started from the referencing project, the library is never visited
    let from_app = collect_dependencies_for_incremental_build(
        &ctx,
        p("app"),
        &[ty("B")],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();
    assert_eq!(
        edges_of(&from_app, "app"),
        [edge("C", "B", DependencyKind::Reference)].into_iter().collect()
    );
    assert!(from_app.edges(&p("lib")).is_none());

    // Started from the library, fan-out reaches the referencing project
    let from_lib = collect_dependencies_for_incremental_build(
        &ctx,
        p("lib"),
        &[ty("B")],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();
    assert!(from_lib.contains(&p("lib"), &edge("A", "B", DependencyKind::Subtype)));
    assert!(from_lib.contains(&p("app"), &edge("C", "B", DependencyKind::Reference)));
    assert_eq!(from_lib.edge_count(), 2);
}

#[test]
fn test_enum_content_bridges_to_enum_type_in_referencing_project() {
    let mut ws = enum_workspace("base", "widgets");
    ws.add_reference(&p("widgets"), &p("base"));
    let ctx = ws.context(&StandardReduction);

    let result = collect_dependencies_for_incremental_build(
        &ctx,
        p("base"),
        &[red()],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();

    let color = ObjectIdentity::new("Color", ArtifactKind::EnumType);
    assert!(result.contains(
        &p("widgets"),
        &DependencyEdge::new(ty("Palette"), color, DependencyKind::Datatype)
    ));
    assert_eq!(result.edge_count(), 1);
}

#[test]
fn test_enum_bridge_respects_scope_and_allowed_kinds() {
    // Enum type lives in a library the reference project depends on: out of scope
    let mut ws = enum_workspace("app", "types");
    ws.add_reference(&p("app"), &p("types"));
    let ctx = ws.context(&StandardReduction);
    let result = collect_dependencies_for_incremental_build(
        &ctx,
        p("app"),
        &[red()],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();
    assert!(result.is_empty());

    // Same project as the type, but datatype edges excluded: no bridge
    let ws = enum_workspace("types", "types");
    let ctx = ws.context(&StandardReduction);
    let mut session = ResolutionSession::new(&ctx, p("types"));
    session
        .collect_dependencies(
            &red(),
            &mut HashSet::new(),
            KindSet::of(&[DependencyKind::Reference]),
        )
        .unwrap();
    assert!(session.collected_dependencies().is_empty());

    // Without bridges the content has no dependants at all
    let ctx = ws.context(&StandardReduction).without_bridges();
    let result = collect_dependencies_for_incremental_build(
        &ctx,
        p("types"),
        &[red()],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_removed_and_changed_lists_union() {
    let ws = chain_workspace();
    let ctx = ws.context(&StandardReduction);
    let run = |changed: &[ObjectIdentity], removed: &[ObjectIdentity]| {
        collect_dependencies_for_incremental_build(
            &ctx,
            p("lib"),
            changed,
            removed,
            ResolverConfig::default(),
        )
        .unwrap()
    };

    let both = run(&[ty("Z")], &[ty("Z")]);
    assert_eq!(both, run(&[ty("Z")], &[]));
    assert_eq!(both.edge_count(), 2);

    let split = run(&[ty("Y")], &[ty("Z")]);
    let mut union = run(&[ty("Y")], &[]);
    for (project, edges) in run(&[], &[ty("Z")]).into_inner() {
        for e in edges {
            union.record(&project, e);
        }
    }
    assert_eq!(split, union);
}

#[test]
fn test_layered_workspace_standard_reduction() {
    let ws = layered_workspace();
    let ctx = ws.context(&StandardReduction);
    let result = collect_dependencies_for_incremental_build(
        &ctx,
        p("core"),
        &[ty("Bytes")],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();

    assert_eq!(
        edges_of(&result, "core"),
        [
            edge("Buffer", "Bytes", DependencyKind::Datatype),
            edge("Frame", "Buffer", DependencyKind::Subtype),
        ]
        .into_iter()
        .collect()
    );
    assert_eq!(
        edges_of(&result, "net"),
        [edge("Socket", "Buffer", DependencyKind::Datatype)].into_iter().collect()
    );
    assert_eq!(
        edges_of(&result, "tools"),
        [edge("Dump", "Bytes", DependencyKind::Reference)].into_iter().collect()
    );
    // Annotation and reference edges do not survive a datatype hop
    assert!(result.edges(&p("ui")).is_none());
    assert!(result.edges(&p("app")).is_none());
}

#[test]
fn test_layered_workspace_reduction_variants() {
    let ws = layered_workspace();
    let run = |ctx: &ResolverContext<'_>| {
        collect_dependencies_for_incremental_build(
            ctx,
            p("core"),
            &[ty("Bytes")],
            &[],
            ResolverConfig::default(),
        )
        .unwrap()
    };

    let direct = run(&ws.context(&DirectReduction));
    assert_eq!(direct.edge_count(), 2); // Buffer and Dump only
    assert!(direct.contains(&p("tools"), &edge("Dump", "Bytes", DependencyKind::Reference)));

    let transitive = run(&ws.context(&TransitiveReduction));
    for expected in [
        ("ui", edge("View", "Frame", DependencyKind::Annotation)),
        ("net", edge("Client", "Socket", DependencyKind::Reference)),
        ("app", edge("Main", "Client", DependencyKind::Import)),
    ] {
        assert!(
            transitive.contains(&p(expected.0), &expected.1),
            "missing {} in {}",
            expected.1,
            expected.0
        );
    }
    assert_eq!(transitive.edge_count(), 7);
}

#[test]
fn test_unbuildable_project_is_skipped() {
    let mut ws = layered_workspace();
    ws.set_buildable(&p("net"), false);
    let ctx = ws.context(&StandardReduction);
    let result = collect_dependencies_for_incremental_build(
        &ctx,
        p("core"),
        &[ty("Bytes")],
        &[],
        ResolverConfig::default(),
    )
    .unwrap();
    assert!(result.edges(&p("net")).is_none());
    assert!(result.edges(&p("core")).is_some());
}
