use crate::domain::identity::ObjectIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dependency kind - why a source depends on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    // ============ Plain use ============
    Reference, // Source mentions target by name
    Import,    // Source imports target's container

    // ============ Type hierarchy ============
    Subtype,    // Source extends / implements target
    InstanceOf, // Source is an instance of target

    // ============ Data ============
    Datatype, // Source uses target as the type of a value

    // ============ Annotations ============
    Annotation,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 6] = [
        DependencyKind::Reference,
        DependencyKind::Import,
        DependencyKind::Subtype,
        DependencyKind::InstanceOf,
        DependencyKind::Datatype,
        DependencyKind::Annotation,
    ];

    fn bit(self) -> u8 {
        match self {
            DependencyKind::Reference => 1 << 0,
            DependencyKind::Import => 1 << 1,
            DependencyKind::Subtype => 1 << 2,
            DependencyKind::InstanceOf => 1 << 3,
            DependencyKind::Datatype => 1 << 4,
            DependencyKind::Annotation => 1 << 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Reference => "reference",
            DependencyKind::Import => "import",
            DependencyKind::Subtype => "subtype",
            DependencyKind::InstanceOf => "instance_of",
            DependencyKind::Datatype => "datatype",
            DependencyKind::Annotation => "annotation",
        }
    }

    /// Kinds allowed on the next hop after following an edge of this kind.
    ///
    /// The result is always a subset of `allowed`.
    pub fn reduce(self, allowed: KindSet) -> KindSet {
        let next = match self {
            // Whoever references a referrer is unaffected by the referrer's own inputs
            DependencyKind::Reference => KindSet::empty(),
            DependencyKind::Import => KindSet::empty(),
            // A subtype's structure changes with its supertype
            DependencyKind::Subtype => allowed,
            DependencyKind::InstanceOf => KindSet::of(&[DependencyKind::Reference]),
            DependencyKind::Datatype => {
                KindSet::of(&[DependencyKind::Datatype, DependencyKind::Subtype])
            }
            DependencyKind::Annotation => {
                KindSet::of(&[DependencyKind::Annotation, DependencyKind::Subtype])
            }
        };
        next.intersection(allowed)
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of dependency kinds that may still propagate along a chain
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DependencyKind>", into = "Vec<DependencyKind>")]
pub struct KindSet(u8);

impl KindSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::of(&DependencyKind::ALL)
    }

    pub fn of(kinds: &[DependencyKind]) -> Self {
        kinds.iter().fold(Self::empty(), |mut set, &k| {
            set.insert(k);
            set
        })
    }

    pub fn contains(&self, kind: DependencyKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: DependencyKind) {
        self.0 |= kind.bit();
    }

    pub fn intersection(self, other: KindSet) -> KindSet {
        Self(self.0 & other.0)
    }

    pub fn is_subset(&self, other: &KindSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = DependencyKind> + '_ {
        DependencyKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Vec<DependencyKind>> for KindSet {
    fn from(kinds: Vec<DependencyKind>) -> Self {
        Self::of(&kinds)
    }
}

impl From<KindSet> for Vec<DependencyKind> {
    fn from(set: KindSet) -> Self {
        set.iter().collect()
    }
}

/// "source depends on target", tagged with why
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: ObjectIdentity,
    pub target: ObjectIdentity,
    pub kind: DependencyKind,
}

impl DependencyEdge {
    pub fn new(source: ObjectIdentity, target: ObjectIdentity, kind: DependencyKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.kind, self.target)
    }
}
