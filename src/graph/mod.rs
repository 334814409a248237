//! Declaration graph supplied by the C++ front end
//!
//! The graph is built once per run through [`DeclarationGraphBuilder`] (or
//! loaded from the JSON interchange format in [`input`]) and is read-only
//! afterwards. Every other component borrows it.

pub mod builder;
pub mod input;

pub use builder::{DeclarationGraphBuilder, DeclarationSpec};
pub use input::{GraphDocument, load_graph};

use crate::types::{DeclId, DeclKind, ModuleId, normalize_qualified, short_name};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An annotation as surfaced by the front end, before extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl RawAnnotation {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            payload: None,
        }
    }

    pub fn with_payload(tag: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            payload: Some(payload.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    /// Fully-qualified name without a leading `::`
    pub name: String,
    pub kind: DeclKind,
    pub module: ModuleId,
    /// Enclosing namespace declaration, if the front end reported one
    pub parent: Option<DeclId>,
    /// Qualified name of the aliased declaration (aliases only)
    pub target: Option<String>,
    pub annotations: Vec<RawAnnotation>,
}

impl Declaration {
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn is_alias(&self) -> bool {
        self.kind == DeclKind::Alias
    }
}

#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    /// Annotations attached at file/module scope
    pub annotations: Vec<RawAnnotation>,
    /// Declarations owned by this module, in source order
    pub declarations: Vec<DeclId>,
}

/// Immutable declaration graph for one run
#[derive(Debug, Default)]
pub struct DeclarationGraph {
    declarations: Vec<Declaration>,
    modules: Vec<Module>,
    by_name: HashMap<String, DeclId>,
    module_by_name: HashMap<String, ModuleId>,
}

impl DeclarationGraph {
    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.index()]
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    /// Look up a declaration by qualified name; a leading `::` is ignored.
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.by_name.get(normalize_qualified(name)).copied()
    }

    pub fn module_named(&self, name: &str) -> Option<ModuleId> {
        self.module_by_name.get(name).copied()
    }

    pub fn contains_module(&self, name: &str) -> bool {
        self.module_by_name.contains_key(name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Modules in run order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// The global traversal order: by module, then by source order.
    pub fn traversal_order(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.modules
            .iter()
            .flat_map(|module| module.declarations.iter().copied())
    }

    /// Enclosing namespaces of `id`, innermost first.
    pub fn enclosing_scopes(&self, id: DeclId) -> EnclosingScopes<'_> {
        EnclosingScopes {
            graph: self,
            next: self.declaration(id).parent,
        }
    }

    pub fn aliases(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|decl| decl.is_alias())
    }
}

pub struct EnclosingScopes<'a> {
    graph: &'a DeclarationGraph,
    next: Option<DeclId>,
}

impl<'a> Iterator for EnclosingScopes<'a> {
    type Item = &'a Declaration;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.graph.declaration(self.next?);
        self.next = current.parent;
        Some(current)
    }
}
