use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Artifact kind - coarse classification of what an identity names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Type,
    EnumType,
    EnumContent, // Member of an enum type; consumers only ever point at the type
    Member,
    Function,
    Variable,
    Module,
    Other,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Type => "type",
            ArtifactKind::EnumType => "enum_type",
            ArtifactKind::EnumContent => "enum_content",
            ArtifactKind::Member => "member",
            ArtifactKind::Function => "function",
            ArtifactKind::Variable => "variable",
            ArtifactKind::Module => "module",
            ArtifactKind::Other => "other",
        }
    }
}

impl FromStr for ArtifactKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s {
            "type" => ArtifactKind::Type,
            "enum_type" => ArtifactKind::EnumType,
            "enum_content" => ArtifactKind::EnumContent,
            "member" => ArtifactKind::Member,
            "function" => ArtifactKind::Function,
            "variable" => ArtifactKind::Variable,
            "module" => ArtifactKind::Module,
            "other" => ArtifactKind::Other,
            _ => return Err(anyhow!("Unknown artifact kind: {s}")),
        };
        Ok(kind)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a logical artifact, independent of the project that owns it.
///
/// Two identities are equal iff both the qualified name and the kind match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    pub qualified_name: String,
    pub kind: ArtifactKind,
}

impl ObjectIdentity {
    pub fn new(qualified_name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
        }
    }

    pub fn is_enum_content(&self) -> bool {
        self.kind == ArtifactKind::EnumContent
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.qualified_name, self.kind)
    }
}

/// Parses the `name#kind` form produced by `Display`.
impl FromStr for ObjectIdentity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, kind) = s
            .rsplit_once('#')
            .ok_or_else(|| anyhow!("Expected <qualified_name>#<kind>, got: {s}"))?;
        if name.is_empty() {
            return Err(anyhow!("Empty qualified name in: {s}"));
        }
        Ok(Self::new(name, kind.parse()?))
    }
}

/// Opaque project handle
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A resolved artifact as seen by an object resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub identity: ObjectIdentity,
    pub project: ProjectId,
    /// For enum content: the enum type it belongs to
    pub enum_type: Option<ObjectIdentity>,
}
