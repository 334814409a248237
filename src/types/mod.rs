use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a declaration within one run's graph.
///
/// Ids are dense: the N-th declaration loaded into the graph gets `DeclId(N + 1)`.
/// Zero is never a valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeclId(pub u32);

/// Identity of a module within one run. Dense like [`DeclId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Struct,
    Alias,
    Function,
    Namespace,
    Enum,
}

impl DeclId {
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Position of this declaration in the graph's storage.
    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl ModuleId {
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Alias => "alias",
            DeclKind::Function => "function",
            DeclKind::Namespace => "namespace",
            DeclKind::Enum => "enum",
        }
    }

    /// Kinds that produce a binding of their own when exposed.
    ///
    /// Namespaces only scope annotations; aliases are bound through their target.
    pub fn is_bindable(&self) -> bool {
        matches!(self, DeclKind::Struct | DeclKind::Function | DeclKind::Enum)
    }
}

impl FromStr for DeclKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "struct" | "class" => Ok(DeclKind::Struct),
            "alias" | "typedef" => Ok(DeclKind::Alias),
            "function" => Ok(DeclKind::Function),
            "namespace" => Ok(DeclKind::Namespace),
            "enum" => Ok(DeclKind::Enum),
            _ => Err("Unknown declaration kind"),
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last `::` separated segment of a qualified name.
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit("::").next().unwrap_or(qualified)
}

/// Strips the leading global-scope qualifier (`::foo::Bar` -> `foo::Bar`).
pub fn normalize_qualified(name: &str) -> &str {
    name.strip_prefix("::").unwrap_or(name)
}
