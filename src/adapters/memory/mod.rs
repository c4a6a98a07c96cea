//! In-memory collaborators: per-project graphs, project topology, artifacts.

pub mod graph;
pub mod topology;
pub mod workspace;

pub use graph::PetgraphDependencyGraph;
pub use topology::StaticTopology;
pub use workspace::InMemoryWorkspace;
