//! Identity bridges - rewrite a changed identity into the identity its consumers
//! actually depend on, before the generic traversal runs.

use crate::domain::edge::{DependencyKind, KindSet};
use crate::domain::identity::{ObjectIdentity, ProjectId};
use crate::domain::ports::ObjectResolver;
use tracing::debug;

/// Where a bridged traversal starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTarget {
    pub identity: ObjectIdentity,
    pub project: ProjectId,
}

/// Identity rewrite hook invoked once per root before the local pass.
///
/// Returning `None` means the bridge does not apply (or its target could not be
/// resolved); traversal of the original root continues either way.
pub trait IdentityBridge {
    fn bridge(
        &self,
        root: &ObjectIdentity,
        project: &ProjectId,
        allowed: &KindSet,
        resolver: &dyn ObjectResolver,
    ) -> Option<BridgeTarget>;
}

/// Enum content has no incoming edges; consumers depend on the enum type.
/// A content change is treated as a change of its enum type.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumContentBridge;

impl IdentityBridge for EnumContentBridge {
    fn bridge(
        &self,
        root: &ObjectIdentity,
        project: &ProjectId,
        allowed: &KindSet,
        resolver: &dyn ObjectResolver,
    ) -> Option<BridgeTarget> {
        if !root.is_enum_content() || !allowed.contains(DependencyKind::Datatype) {
            return None;
        }
        let Some(artifact) = resolver.find_object(root, project) else {
            debug!(%root, %project, "enum content not found, not bridging");
            return None;
        };
        let Some((identity, project)) = resolver.find_enum_type(&artifact, project) else {
            debug!(%root, "enum type not found, not bridging");
            return None;
        };
        Some(BridgeTarget { identity, project })
    }
}
