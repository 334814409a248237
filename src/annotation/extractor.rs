//! Raw annotation validation and parallel extraction over a graph

use super::{Annotation, AnnotationCache, AnnotationSet, AnnotationSite, Directive, PayloadRule};
use crate::error::ResolveError;
use crate::graph::{Declaration, DeclarationGraph, Module, RawAnnotation};
use crate::types::{DeclId, ModuleId};
use rayon::prelude::*;
use std::collections::HashMap;

/// Result of extracting every annotation in a graph.
///
/// Errors are keyed by owner so the plan builder can report them in
/// traversal order regardless of which thread produced them.
#[derive(Default)]
pub struct ExtractionOutcome {
    pub cache: AnnotationCache,
    pub declaration_errors: HashMap<DeclId, Vec<ResolveError>>,
    pub module_errors: HashMap<ModuleId, Vec<ResolveError>>,
}

impl ExtractionOutcome {
    pub fn error_count(&self) -> usize {
        self.declaration_errors.values().map(Vec::len).sum::<usize>()
            + self.module_errors.values().map(Vec::len).sum::<usize>()
    }
}

pub struct AnnotationExtractor;

impl AnnotationExtractor {
    /// Validate `raw` annotations owned by `owner`, attached at `site`.
    ///
    /// Every problem in the list is reported, not just the first.
    pub fn extract(
        owner: &str,
        site: AnnotationSite,
        raw: &[RawAnnotation],
    ) -> Result<AnnotationSet, Vec<ResolveError>> {
        let mut items = Vec::with_capacity(raw.len());
        let mut errors = Vec::new();

        for annotation in raw {
            match Self::extract_one(owner, site, annotation) {
                Ok(item) => items.push(item),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(AnnotationSet::new(items))
        } else {
            Err(errors)
        }
    }

    pub fn extract_declaration(decl: &Declaration) -> Result<AnnotationSet, Vec<ResolveError>> {
        Self::extract(
            &decl.name,
            AnnotationSite::Declaration(decl.kind),
            &decl.annotations,
        )
    }

    pub fn extract_module(module: &Module) -> Result<AnnotationSet, Vec<ResolveError>> {
        Self::extract(&module.name, AnnotationSite::ModuleScope, &module.annotations)
    }

    /// Extract annotations for every declaration and module in parallel.
    ///
    /// Runs on the current rayon pool.
    pub fn extract_all(graph: &DeclarationGraph) -> ExtractionOutcome {
        let outcome = ExtractionOutcome::default();

        let declaration_errors: HashMap<DeclId, Vec<ResolveError>> = graph
            .declarations()
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|decl| match Self::extract_declaration(decl) {
                Ok(set) => {
                    outcome.cache.insert(decl.id, set);
                    None
                }
                Err(errors) => Some((decl.id, errors)),
            })
            .collect();

        let module_errors: HashMap<ModuleId, Vec<ResolveError>> = graph
            .modules()
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|module| match Self::extract_module(module) {
                Ok(set) => {
                    outcome.cache.insert_module(module.id, set);
                    None
                }
                Err(errors) => Some((module.id, errors)),
            })
            .collect();

        let outcome = ExtractionOutcome {
            declaration_errors,
            module_errors,
            ..outcome
        };

        tracing::debug!(
            extracted = outcome.cache.declaration_count(),
            errors = outcome.error_count(),
            "annotation extraction finished"
        );
        outcome
    }

    fn extract_one(
        owner: &str,
        site: AnnotationSite,
        raw: &RawAnnotation,
    ) -> Result<Annotation, ResolveError> {
        let directive: Directive =
            raw.tag
                .parse()
                .map_err(|_| ResolveError::UnknownAnnotation {
                    declaration: owner.to_string(),
                    tag: raw.tag.clone(),
                })?;

        let malformed = |reason: String| ResolveError::MalformedAnnotation {
            declaration: owner.to_string(),
            directive: directive.as_str().to_string(),
            reason,
        };

        if !directive.allowed_on(site) {
            return Err(malformed(format!("cannot be attached to a {site}")));
        }

        let payload = raw.payload.as_deref().map(str::trim);
        if payload == Some("") {
            return Err(malformed("payload is empty".to_string()));
        }

        match (directive.payload_rule(), payload) {
            (PayloadRule::Forbidden, Some(p)) => {
                return Err(malformed(format!("takes no payload, got '{p}'")));
            }
            (PayloadRule::Required, None) => {
                return Err(malformed("requires a payload".to_string()));
            }
            _ => {}
        }

        let payload = payload.map(str::to_string);
        Ok(match directive {
            Directive::Visible => Annotation::Visible,
            Directive::Hidden => Annotation::Hidden,
            Directive::Encourage => Annotation::Encourage,
            Directive::ExposeHere => Annotation::ExposeHere { module: payload },
            Directive::Manual => Annotation::Manual {
                code: payload.unwrap_or_default(),
            },
            Directive::Import => Annotation::Import {
                module: payload.unwrap_or_default(),
            },
        })
    }
}
