//! Cross-module reference resolution
//!
//! Tracks, per module, which other modules' generated bindings it must
//! import. Imports come from two places:
//! - explicit `import` annotations at module or namespace scope
//! - references inferred from aliases that bind an entity emitted elsewhere
//!
//! Manual code blocks are checked against the explicit imports only; an
//! `import("x")` call inside manual code never creates a requirement by itself.
//! References to modules outside the run (host libraries) are not checked.
//! Relocations (`expose_here`) move an emission site and add no import.

mod cycles;

pub use cycles::import_cycles;

use crate::error::{ResolveError, Warning};
use crate::graph::DeclarationGraph;
use crate::types::{DeclId, ModuleId};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

static MANUAL_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*\(\s*"([^"]+)"\s*\)"#).expect("manual import pattern is valid")
});

/// Modules referenced by `import("…")` calls in a manual code block, in order of appearance.
pub fn scan_manual_imports(code: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    MANUAL_IMPORT
        .captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ImportOrigin {
    /// Declared with an `import` annotation
    Explicit,
    /// Required because an alias in this module binds an entity emitted in the imported one
    Inferred { via: DeclId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleImport {
    pub module: ModuleId,
    #[serde(flatten)]
    pub origin: ImportOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualBlock {
    /// Declaration or module the block was attached to
    pub owner: String,
    pub code: String,
    /// Modules the code imports, as scanned from the block
    pub references: Vec<String>,
}

/// `declaration` is emitted in `site` instead of its home module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub declaration: DeclId,
    pub home: ModuleId,
    pub site: ModuleId,
    /// Alias carrying the `expose_here` directive
    pub via: DeclId,
}

/// Imports and manual code of one module after resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleImports {
    pub imports: Vec<ModuleImport>,
    pub manual_blocks: Vec<ManualBlock>,
}

#[derive(Debug, Default)]
struct ModuleLedger {
    /// (target module name, owner) in annotation order
    explicit: Vec<(String, String)>,
    inferred: Vec<(ModuleId, DeclId)>,
    manual: Vec<ManualBlock>,
}

pub struct ResolvedModules {
    /// Indexed by module position in run order
    pub modules: Vec<ModuleImports>,
    pub relocations: Vec<Relocation>,
    pub errors: Vec<ResolveError>,
    pub warnings: Vec<Warning>,
}

pub struct CrossModuleResolver<'g> {
    graph: &'g DeclarationGraph,
    ledgers: Vec<ModuleLedger>,
    relocations: Vec<Relocation>,
}

impl<'g> CrossModuleResolver<'g> {
    pub fn new(graph: &'g DeclarationGraph) -> Self {
        Self {
            graph,
            ledgers: (0..graph.module_count())
                .map(|_| ModuleLedger::default())
                .collect(),
            relocations: Vec::new(),
        }
    }

    pub fn record_explicit_import(&mut self, module: ModuleId, target: &str, owner: &str) {
        self.ledgers[module.index()]
            .explicit
            .push((target.to_string(), owner.to_string()));
    }

    pub fn record_manual(&mut self, module: ModuleId, owner: &str, code: &str) {
        self.ledgers[module.index()].manual.push(ManualBlock {
            owner: owner.to_string(),
            code: code.to_string(),
            references: scan_manual_imports(code),
        });
    }

    /// `from` binds something emitted in `emitted_in`, through alias `via`.
    pub fn record_reference(&mut self, from: ModuleId, emitted_in: ModuleId, via: DeclId) {
        if from != emitted_in {
            self.ledgers[from.index()].inferred.push((emitted_in, via));
        }
    }

    pub fn record_relocation(&mut self, relocation: Relocation) {
        tracing::debug!(
            declaration = %self.graph.declaration(relocation.declaration).name,
            home = %self.graph.module(relocation.home).name,
            site = %self.graph.module(relocation.site).name,
            "relocated emission site"
        );
        self.relocations.push(relocation);
    }

    /// Validate everything recorded and produce final per-module import lists.
    pub fn finish(self) -> ResolvedModules {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut modules = Vec::with_capacity(self.ledgers.len());

        for (index, ledger) in self.ledgers.into_iter().enumerate() {
            let module = ModuleId::from_index(index);
            let module_name = &self.graph.module(module).name;
            let mut imports = Vec::new();
            let mut seen = HashSet::new();
            let mut declared = HashSet::new();

            for (target, _owner) in &ledger.explicit {
                declared.insert(target.as_str());

                let Some(target_id) = self.graph.module_named(target) else {
                    let error = ResolveError::DanglingImport {
                        module: module_name.clone(),
                        target: target.clone(),
                    };
                    if !errors.contains(&error) {
                        errors.push(error);
                    }
                    continue;
                };

                if target_id == module {
                    let warning = Warning::SelfImport {
                        module: module_name.clone(),
                    };
                    if !warnings.contains(&warning) {
                        tracing::warn!("{warning}");
                        warnings.push(warning);
                    }
                    continue;
                }

                if seen.insert(target_id) {
                    imports.push(ModuleImport {
                        module: target_id,
                        origin: ImportOrigin::Explicit,
                    });
                }
            }

            for (target_id, via) in &ledger.inferred {
                if seen.insert(*target_id) {
                    imports.push(ModuleImport {
                        module: *target_id,
                        origin: ImportOrigin::Inferred { via: *via },
                    });
                }
            }

            for block in &ledger.manual {
                for referenced in &block.references {
                    // Only generated modules of this run need a declared import.
                    if referenced == module_name
                        || declared.contains(referenced.as_str())
                        || !self.graph.contains_module(referenced)
                    {
                        continue;
                    }
                    let error = ResolveError::MissingImportDeclaration {
                        module: module_name.clone(),
                        referenced: referenced.clone(),
                    };
                    if !errors.contains(&error) {
                        errors.push(error);
                    }
                }
            }

            modules.push(ModuleImports {
                imports,
                manual_blocks: ledger.manual,
            });
        }

        let edges: Vec<Vec<ModuleId>> = modules
            .iter()
            .map(|m| m.imports.iter().map(|i| i.module).collect())
            .collect();
        for cycle in import_cycles(&edges) {
            let warning = Warning::ImportCycle {
                modules: cycle
                    .iter()
                    .map(|id| self.graph.module(*id).name.clone())
                    .collect(),
            };
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        ResolvedModules {
            modules,
            relocations: self.relocations,
            errors,
            warnings,
        }
    }
}
