//! Workspace builders and snapshot files for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use stale_scope::adapters::memory::InMemoryWorkspace;
use stale_scope::domain::edge::{DependencyEdge, DependencyKind};
use stale_scope::domain::identity::{ArtifactKind, ObjectIdentity, ProjectId};
use tempfile::TempDir;

pub fn p(name: &str) -> ProjectId {
    ProjectId::new(name)
}

pub fn ty(name: &str) -> ObjectIdentity {
    ObjectIdentity::new(name, ArtifactKind::Type)
}

pub fn edge(src: &str, dst: &str, kind: DependencyKind) -> DependencyEdge {
    DependencyEdge::new(ty(src), ty(dst), kind)
}

/// Single project with `X -> Y -> Z`, all subtype edges.
pub fn chain_workspace() -> InMemoryWorkspace {
    let mut ws = InMemoryWorkspace::new();
    ws.add_edge(&p("lib"), edge("Y", "Z", DependencyKind::Subtype));
    ws.add_edge(&p("lib"), edge("X", "Y", DependencyKind::Subtype));
    ws
}

/// `app` references `lib`; `lib` holds `A -> B`, `app` holds `C -> B`.
pub fn two_project_workspace() -> InMemoryWorkspace {
    let mut ws = InMemoryWorkspace::new();
    ws.add_reference(&p("app"), &p("lib"));
    ws.add_edge(&p("lib"), edge("A", "B", DependencyKind::Subtype));
    ws.add_edge(&p("app"), edge("C", "B", DependencyKind::Reference));
    ws
}

/// Enum content `Color.RED` lives in `content_project`, its enum type `Color`
/// lives in `type_project` where `Palette` depends on it as a datatype.
pub fn enum_workspace(content_project: &str, type_project: &str) -> InMemoryWorkspace {
    let color = ObjectIdentity::new("Color", ArtifactKind::EnumType);
    let mut ws = InMemoryWorkspace::new();
    ws.add_artifact(&p(type_project), color.clone(), None);
    ws.add_artifact(&p(content_project), red(), Some(color.clone()));
    ws.add_edge(
        &p(type_project),
        DependencyEdge::new(ty("Palette"), color, DependencyKind::Datatype),
    );
    ws
}

pub fn red() -> ObjectIdentity {
    ObjectIdentity::new("Color.RED", ArtifactKind::EnumContent)
}

/// Layered DAG: core <- net <- ui <- app, plus a sibling `tools` on core.
pub fn layered_workspace() -> InMemoryWorkspace {
    let mut ws = InMemoryWorkspace::new();
    ws.add_reference(&p("net"), &p("core"));
    ws.add_reference(&p("ui"), &p("net"));
    ws.add_reference(&p("app"), &p("ui"));
    ws.add_reference(&p("tools"), &p("core"));

    ws.add_edge(&p("core"), edge("Buffer", "Bytes", DependencyKind::Datatype));
    ws.add_edge(&p("core"), edge("Frame", "Buffer", DependencyKind::Subtype));
    ws.add_edge(&p("net"), edge("Socket", "Buffer", DependencyKind::Datatype));
    ws.add_edge(&p("net"), edge("Client", "Socket", DependencyKind::Reference));
    ws.add_edge(&p("ui"), edge("View", "Frame", DependencyKind::Annotation));
    ws.add_edge(&p("app"), edge("Main", "Client", DependencyKind::Import));
    ws.add_edge(&p("tools"), edge("Dump", "Bytes", DependencyKind::Reference));
    ws
}

pub const SNAPSHOT_JSON: &str = r#"{
    "projects": [
        {
            "name": "core",
            "artifacts": [
                {"qualified_name": "Color", "kind": "enum_type"},
                {"qualified_name": "Color.RED", "kind": "enum_content",
                 "enum_type": {"qualified_name": "Color", "kind": "enum_type"}}
            ],
            "edges": [
                {"source": {"qualified_name": "Palette", "kind": "type"},
                 "target": {"qualified_name": "Color", "kind": "enum_type"},
                 "kind": "datatype"},
                {"source": {"qualified_name": "Brush", "kind": "type"},
                 "target": {"qualified_name": "Palette", "kind": "type"},
                 "kind": "subtype"}
            ]
        },
        {
            "name": "ui",
            "references": ["core"],
            "edges": [
                {"source": {"qualified_name": "Theme", "kind": "type"},
                 "target": {"qualified_name": "Palette", "kind": "type"},
                 "kind": "reference"}
            ]
        },
        {"name": "app", "references": ["ui"]}
    ]
}"#;

/// Write `json` to a snapshot file in a fresh temp dir. Keep the dir alive.
pub fn write_snapshot(json: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.json");
    std::fs::write(&path, json).unwrap();
    (dir, path)
}
