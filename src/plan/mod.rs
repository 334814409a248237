//! The exposure plan: what is bound, where, and under which name
//!
//! [`PlanBuilder`] owns the plan while declarations are visited and hands out
//! a read-only [`ExposurePlan`] from [`PlanBuilder::finalize`]. The finalized
//! plan has no mutating API.

pub mod builder;
pub mod report;

pub use builder::PlanBuilder;
pub use report::{PlanReport, RelocationReport};

use crate::error::Warning;
use crate::modules::{ManualBlock, ModuleImport, Relocation};
use crate::types::{DeclId, DeclKind, ModuleId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureKind {
    /// The declaration itself is visible and emitted in its home module
    Direct,
    /// Emission moved to another module through `expose_here`
    Relocated,
    /// Exposed only because an alias asks for it
    ForwardedAlias,
}

/// An alias bound as its own name, forwarding to a plan entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardedAlias {
    pub alias: DeclId,
    pub module: ModuleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    /// Canonical identity: the underlying non-alias declaration
    pub canonical: DeclId,
    pub qualified_name: String,
    pub kind: DeclKind,
    pub home_module: ModuleId,
    pub emission_module: ModuleId,
    pub external_name: String,
    pub exposure: ExposureKind,
    /// Alias whose name was chosen as the external name, if any
    pub named_by: Option<DeclId>,
    pub forwarded: Vec<ForwardedAlias>,
}

impl PlanEntry {
    pub fn is_relocated(&self) -> bool {
        self.exposure == ExposureKind::Relocated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePlan {
    pub id: ModuleId,
    pub name: String,
    /// Generated bindings of these modules must be imported, in this order
    pub imports: Vec<ModuleImport>,
    pub manual_blocks: Vec<ManualBlock>,
}

/// Finalized, read-only result of a run
#[derive(Debug, Clone)]
pub struct ExposurePlan {
    entries: Vec<PlanEntry>,
    by_canonical: HashMap<DeclId, usize>,
    /// Resolved aliases mapped to their canonical target
    alias_targets: HashMap<DeclId, DeclId>,
    modules: Vec<ModulePlan>,
    relocations: Vec<Relocation>,
    warnings: Vec<Warning>,
}

impl ExposurePlan {
    pub(crate) fn new(
        entries: Vec<PlanEntry>,
        alias_targets: HashMap<DeclId, DeclId>,
        modules: Vec<ModulePlan>,
        relocations: Vec<Relocation>,
        warnings: Vec<Warning>,
    ) -> Self {
        let by_canonical = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.canonical, i))
            .collect();

        Self {
            entries,
            by_canonical,
            alias_targets,
            modules,
            relocations,
            warnings,
        }
    }

    /// Entries in traversal order of their canonical declarations' first exposure.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose canonical identity is `id`.
    pub fn entry(&self, id: DeclId) -> Option<&PlanEntry> {
        self.by_canonical.get(&id).map(|&i| &self.entries[i])
    }

    pub fn entry_named(&self, qualified_name: &str) -> Option<&PlanEntry> {
        let name = crate::types::normalize_qualified(qualified_name);
        self.entries.iter().find(|e| e.qualified_name == name)
    }

    /// Entry any declaration resolves to: itself, or the target of the alias chain it starts.
    pub fn lookup(&self, id: DeclId) -> Option<&PlanEntry> {
        self.entry(id)
            .or_else(|| self.alias_targets.get(&id).and_then(|t| self.entry(*t)))
    }

    pub fn modules(&self) -> &[ModulePlan] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> &ModulePlan {
        &self.modules[id.index()]
    }

    pub fn module_named(&self, name: &str) -> Option<&ModulePlan> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn imports_of(&self, id: ModuleId) -> &[ModuleImport] {
        &self.modules[id.index()].imports
    }

    /// Entries emitted in module `id`.
    pub fn emitted_in(&self, id: ModuleId) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(move |e| e.emission_module == id)
    }

    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
