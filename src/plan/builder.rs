//! Single-threaded reducer that turns per-declaration results into a plan
//!
//! Declarations must be visited in the graph's traversal order (module, then
//! source order). Tie-breaks and conflict reports depend on that order, so
//! the same graph always yields the same plan and the same error list.

use super::{ExposureKind, ExposurePlan, ForwardedAlias, ModulePlan, PlanEntry};
use crate::alias::{AliasRequest, AliasResolutions, choose_external_name};
use crate::annotation::{
    AnnotationSet, Directive, ExtractionOutcome, ScopeVisibility, VisibilityConflict,
};
use crate::context::RunContext;
use crate::error::{PlanInvalid, ResolveError, Warning};
use crate::graph::{Declaration, DeclarationGraph, Module};
use crate::modules::{CrossModuleResolver, Relocation};
use crate::types::{DeclId, DeclKind, ModuleId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Everything known about one canonical target while the graph is visited
#[derive(Debug, Default)]
struct TargetSlot {
    /// The target is visible on its own (annotation or inherited scope)
    direct: bool,
    /// The target carries `hidden` itself
    own_hidden: bool,
    requests: Vec<AliasRequest>,
}

pub struct PlanBuilder<'a> {
    ctx: &'a RunContext,
    extraction: &'a ExtractionOutcome,
    aliases: &'a AliasResolutions,
    modules: CrossModuleResolver<'a>,
    slots: HashMap<DeclId, TargetSlot>,
    slot_order: Vec<DeclId>,
    alias_targets: HashMap<DeclId, DeclId>,
    reported_cycles: HashSet<Vec<String>>,
    errors: Vec<ResolveError>,
    warnings: Vec<Warning>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        ctx: &'a RunContext,
        extraction: &'a ExtractionOutcome,
        aliases: &'a AliasResolutions,
    ) -> Self {
        Self {
            ctx,
            extraction,
            aliases,
            modules: CrossModuleResolver::new(ctx.graph()),
            slots: HashMap::new(),
            slot_order: Vec::new(),
            alias_targets: HashMap::new(),
            reported_cycles: HashSet::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn graph(&self) -> &'a DeclarationGraph {
        self.ctx.graph()
    }

    /// Record module-scope directives. Call before visiting the module's declarations.
    pub fn visit_module(&mut self, module: &Module) {
        if let Some(errors) = self.extraction.module_errors.get(&module.id) {
            self.errors.extend(errors.iter().cloned());
        }
        let Some(set) = self.extraction.cache.get_module(module.id) else {
            return;
        };

        if set.visibility().is_err() {
            self.errors.push(ResolveError::ConflictingVisibility {
                declaration: module.name.clone(),
            });
        }
        self.record_scope_directives(module.id, &module.name, &set);
    }

    pub fn visit(&mut self, id: DeclId) {
        let decl = self.graph().declaration(id);

        if let Some(errors) = self.extraction.declaration_errors.get(&id) {
            self.errors.extend(errors.iter().cloned());
        }
        // Chain errors do not depend on the alias's own annotations.
        let aliases = self.aliases;
        if let Some(Err(error)) = aliases.get(&id) {
            self.report_alias_error(error);
        }
        // Extraction failures are already reported; nothing reliable is left to plan.
        let Some(set) = self.extraction.cache.get(id) else {
            return;
        };

        match decl.kind {
            DeclKind::Namespace => {
                if set.visibility().is_err() {
                    self.conflicting(decl);
                }
                self.record_scope_directives(decl.module, &decl.name, &set);
            }
            DeclKind::Alias => self.visit_alias(decl, &set),
            DeclKind::Struct | DeclKind::Function | DeclKind::Enum => {
                self.record_scope_directives(decl.module, &decl.name, &set);
                match self.effective_visibility(decl, &set) {
                    Ok(visible) => {
                        if visible {
                            self.slot(id).direct = true;
                        }
                    }
                    Err(VisibilityConflict) => self.conflicting(decl),
                }
            }
        }
    }

    fn visit_alias(&mut self, decl: &'a Declaration, set: &AnnotationSet) {
        let own = match set.visibility() {
            Ok(own) => own,
            Err(VisibilityConflict) => {
                self.conflicting(decl);
                return;
            }
        };

        let aliases = self.aliases;
        let chain = match aliases.get(&decl.id) {
            Some(Ok(chain)) => chain,
            Some(Err(_)) | None => return,
        };

        let target = self.graph().declaration(chain.target);
        if !target.kind.is_bindable() {
            tracing::debug!(
                alias = %decl.name,
                target = %target.name,
                "alias targets a {}, nothing to bind",
                target.kind
            );
            return;
        }
        self.alias_targets.insert(decl.id, target.id);

        if own == Some(ScopeVisibility::Hidden) {
            return;
        }

        let relocate_to = match set.expose_here() {
            None => None,
            Some(None) => Some(decl.module),
            Some(Some(name)) => match self.graph().module_named(name) {
                Some(module) => Some(module),
                None => {
                    self.errors.push(ResolveError::MalformedAnnotation {
                        declaration: decl.name.clone(),
                        directive: "expose_here".to_string(),
                        reason: format!("names unknown module '{name}'"),
                    });
                    return;
                }
            },
        };

        let request = AliasRequest {
            alias: decl.id,
            qualified_name: decl.name.clone(),
            name: decl.short_name().to_string(),
            module: decl.module,
            forward: set.has(Directive::Visible),
            encourage: set.has(Directive::Encourage),
            relocate_to,
            implicit: own.is_none() && self.inherited_visibility(decl),
        };

        if request.is_explicit() || request.implicit {
            self.slot(target.id).requests.push(request);
        }
    }

    fn report_alias_error(&mut self, error: &ResolveError) {
        if let ResolveError::CyclicAlias { cycle } = error {
            if !self.reported_cycles.insert(cycle.clone()) {
                return;
            }
        }
        if !self.errors.contains(error) {
            self.errors.push(error.clone());
        }
    }

    fn record_scope_directives(&mut self, module: ModuleId, owner: &str, set: &AnnotationSet) {
        for target in set.imports() {
            self.modules.record_explicit_import(module, target, owner);
        }
        for code in set.manual_blocks() {
            self.modules.record_manual(module, owner, code);
        }
    }

    fn conflicting(&mut self, decl: &Declaration) {
        self.errors.push(ResolveError::ConflictingVisibility {
            declaration: decl.name.clone(),
        });
    }

    fn slot(&mut self, target: DeclId) -> &mut TargetSlot {
        if !self.slots.contains_key(&target) {
            let own_hidden = self
                .extraction
                .cache
                .get(target)
                .is_some_and(|set| set.visibility() == Ok(Some(ScopeVisibility::Hidden)));
            self.slot_order.push(target);
            self.slots.insert(
                target,
                TargetSlot {
                    own_hidden,
                    ..TargetSlot::default()
                },
            );
        }
        self.slots.entry(target).or_default()
    }

    /// Own annotation first, then enclosing namespaces innermost first, then
    /// module scope, then the configured default. `Err` on an own-level conflict.
    fn effective_visibility(
        &self,
        decl: &Declaration,
        set: &AnnotationSet,
    ) -> Result<bool, VisibilityConflict> {
        match set.visibility()? {
            Some(visibility) => Ok(visibility == ScopeVisibility::Visible),
            None => Ok(self.inherited_visibility(decl)),
        }
    }

    /// Visibility a declaration inherits from its scopes, ignoring its own annotations.
    ///
    /// Conflicting ancestors are reported when they are visited and skipped here.
    fn inherited_visibility(&self, decl: &Declaration) -> bool {
        let graph = self.graph();
        let cache = &self.extraction.cache;

        let scoped = graph
            .enclosing_scopes(decl.id)
            .filter_map(|scope| cache.get(scope.id))
            .chain(cache.get_module(decl.module))
            .find_map(|set: Arc<AnnotationSet>| set.visibility().ok().flatten());

        match scoped {
            Some(visibility) => visibility == ScopeVisibility::Visible,
            None => self.ctx.exposes_by_default(),
        }
    }

    /// Decide every entry, run the global checks, and freeze the plan.
    ///
    /// Fails with every collected error if any check fails; no partial plan is returned.
    pub fn finalize(mut self) -> Result<ExposurePlan, PlanInvalid> {
        let graph = self.graph();
        let mut entries: Vec<PlanEntry> = Vec::with_capacity(self.slot_order.len());

        for target_id in std::mem::take(&mut self.slot_order) {
            let Some(slot) = self.slots.remove(&target_id) else {
                continue;
            };
            let target = graph.declaration(target_id);

            if slot.own_hidden {
                for request in slot.requests.iter().filter(|r| r.is_explicit()) {
                    let warning = Warning::AliasToHidden {
                        alias: request.qualified_name.clone(),
                        target: target.name.clone(),
                    };
                    tracing::warn!("{warning}");
                    self.warnings.push(warning);
                }
                continue;
            }

            let naming = match choose_external_name(
                &target.name,
                target.short_name(),
                slot.direct,
                &slot.requests,
            ) {
                Ok(Some(naming)) => naming,
                Ok(None) => continue,
                Err(error) => {
                    self.errors.push(error);
                    continue;
                }
            };

            let mut sites: Vec<(ModuleId, DeclId)> = Vec::new();
            for request in &slot.requests {
                if let Some(site) = request.relocate_to {
                    if !sites.iter().any(|(m, _)| *m == site) {
                        sites.push((site, request.alias));
                    }
                }
            }
            if sites.len() > 1 {
                self.errors.push(ResolveError::DuplicateEmission {
                    declaration: target.name.clone(),
                    sites: sites
                        .iter()
                        .map(|(m, _)| graph.module(*m).name.clone())
                        .collect(),
                });
                continue;
            }

            let relocation = sites
                .first()
                .copied()
                .filter(|(site, _)| *site != target.module);
            let emission_module = relocation.map_or(target.module, |(site, _)| site);
            let exposure = match (relocation, slot.direct) {
                (Some(_), _) => ExposureKind::Relocated,
                (None, true) => ExposureKind::Direct,
                (None, false) => ExposureKind::ForwardedAlias,
            };

            if let Some((site, via)) = relocation {
                self.modules.record_relocation(Relocation {
                    declaration: target_id,
                    home: target.module,
                    site,
                    via,
                });
            }

            let named_by = naming.source.alias();
            let mut forwarded = Vec::new();
            for request in &slot.requests {
                let names_entry = named_by == Some(request.alias);
                if request.forward && !names_entry {
                    forwarded.push(ForwardedAlias {
                        alias: request.alias,
                        module: request.module,
                        name: request.name.clone(),
                    });
                }
                if request.forward || names_entry {
                    self.modules
                        .record_reference(request.module, emission_module, request.alias);
                }
            }

            entries.push(PlanEntry {
                canonical: target_id,
                qualified_name: target.name.clone(),
                kind: target.kind,
                home_module: target.module,
                emission_module,
                external_name: naming.external_name,
                exposure,
                named_by,
                forwarded,
            });
        }

        let resolved = self.modules.finish();
        self.errors.extend(resolved.errors);
        self.warnings.extend(resolved.warnings);

        if !self.errors.is_empty() {
            tracing::info!(errors = self.errors.len(), "exposure plan rejected");
            return Err(PlanInvalid::new(self.errors));
        }

        let modules = graph
            .modules()
            .zip(resolved.modules)
            .map(|(module, imports)| ModulePlan {
                id: module.id,
                name: module.name.clone(),
                imports: imports.imports,
                manual_blocks: imports.manual_blocks,
            })
            .collect();

        tracing::info!(
            entries = entries.len(),
            relocations = resolved.relocations.len(),
            warnings = self.warnings.len(),
            "exposure plan finalized"
        );

        Ok(ExposurePlan::new(
            entries,
            self.alias_targets,
            modules,
            resolved.relocations,
            self.warnings,
        ))
    }
}
