//! Incremental construction of a [`DeclarationGraph`]

use super::{Declaration, DeclarationGraph, Module, RawAnnotation};
use crate::error::{GraphError, GraphResult};
use crate::types::{DeclId, DeclKind, ModuleId, normalize_qualified};
use std::collections::{HashMap, HashSet};

/// Front-end description of one declaration
#[derive(Debug, Clone)]
pub struct DeclarationSpec {
    pub name: String,
    pub kind: DeclKind,
    pub module: String,
    pub parent: Option<String>,
    pub target: Option<String>,
    pub annotations: Vec<RawAnnotation>,
}

impl DeclarationSpec {
    pub fn new(name: impl Into<String>, kind: DeclKind, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            module: module.into(),
            parent: None,
            target: None,
            annotations: Vec::new(),
        }
    }

    /// Shorthand for an alias declaration `using name = target`.
    pub fn alias(
        name: impl Into<String>,
        module: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::new(name, DeclKind::Alias, module).target(target)
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn annotate(mut self, tag: impl Into<String>) -> Self {
        self.annotations.push(RawAnnotation::new(tag));
        self
    }

    pub fn annotate_with(mut self, tag: impl Into<String>, payload: impl Into<String>) -> Self {
        self.annotations
            .push(RawAnnotation::with_payload(tag, payload));
        self
    }
}

/// Collects modules and declarations, then validates them into a graph.
///
/// Parents are resolved in [`build`](Self::build), so declarations may be
/// added before the namespace that encloses them.
#[derive(Debug, Default)]
pub struct DeclarationGraphBuilder {
    modules: Vec<Module>,
    module_by_name: HashMap<String, ModuleId>,
    declarations: Vec<Declaration>,
    by_name: HashMap<String, DeclId>,
    pending_parents: Vec<(DeclId, String)>,
}

impl DeclarationGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(
        &mut self,
        name: impl Into<String>,
        annotations: Vec<RawAnnotation>,
    ) -> GraphResult<ModuleId> {
        let name = name.into();
        if self.module_by_name.contains_key(&name) {
            return Err(GraphError::DuplicateModule { name });
        }

        let id = ModuleId::from_index(self.modules.len());
        self.module_by_name.insert(name.clone(), id);
        self.modules.push(Module {
            id,
            name,
            annotations,
            declarations: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_declaration(&mut self, spec: DeclarationSpec) -> GraphResult<DeclId> {
        let name = normalize_qualified(&spec.name).to_string();

        if self.by_name.contains_key(&name) {
            return Err(GraphError::DuplicateDeclaration { name });
        }

        let module = *self
            .module_by_name
            .get(&spec.module)
            .ok_or_else(|| GraphError::UnknownModule {
                declaration: name.clone(),
                module: spec.module.clone(),
            })?;

        match (spec.kind, &spec.target) {
            (DeclKind::Alias, None) => {
                return Err(GraphError::MissingAliasTarget { declaration: name });
            }
            (kind, Some(_)) if kind != DeclKind::Alias => {
                return Err(GraphError::UnexpectedAliasTarget { declaration: name });
            }
            _ => {}
        }

        let id = DeclId::from_index(self.declarations.len());
        if let Some(parent) = spec.parent {
            self.pending_parents
                .push((id, normalize_qualified(&parent).to_string()));
        }

        self.by_name.insert(name.clone(), id);
        self.modules[module.index()].declarations.push(id);
        self.declarations.push(Declaration {
            id,
            name,
            kind: spec.kind,
            module,
            parent: None,
            target: spec.target,
            annotations: spec.annotations,
        });

        Ok(id)
    }

    pub fn build(mut self) -> GraphResult<DeclarationGraph> {
        for (child, parent_name) in std::mem::take(&mut self.pending_parents) {
            let child_name = self.declarations[child.index()].name.clone();
            let parent = *self
                .by_name
                .get(&parent_name)
                .ok_or_else(|| GraphError::UnknownParent {
                    declaration: child_name.clone(),
                    parent: parent_name.clone(),
                })?;

            if self.declarations[parent.index()].kind != DeclKind::Namespace {
                return Err(GraphError::ParentNotNamespace {
                    declaration: child_name,
                    parent: parent_name,
                });
            }
            self.declarations[child.index()].parent = Some(parent);
        }
        self.check_parent_chains()?;

        tracing::debug!(
            modules = self.modules.len(),
            declarations = self.declarations.len(),
            "declaration graph built"
        );

        Ok(DeclarationGraph {
            declarations: self.declarations,
            modules: self.modules,
            by_name: self.by_name,
            module_by_name: self.module_by_name,
        })
    }

    /// Every parent chain must end at a top-level declaration.
    fn check_parent_chains(&self) -> GraphResult<()> {
        let mut settled: HashSet<DeclId> = HashSet::new();

        for start in &self.declarations {
            let mut seen = HashSet::new();
            let mut current = Some(start.id);
            while let Some(id) = current {
                if settled.contains(&id) {
                    break;
                }
                if !seen.insert(id) {
                    return Err(GraphError::CyclicParent {
                        declaration: start.name.clone(),
                        parent: self.declarations[id.index()].name.clone(),
                    });
                }
                current = self.declarations[id.index()].parent;
            }
            settled.extend(seen);
        }
        Ok(())
    }
}
