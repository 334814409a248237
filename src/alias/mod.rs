//! Alias resolution engine
//!
//! Aliases (`using X = Y`) form an explicit directed graph: each alias node
//! has one outgoing edge to its target. Resolving an alias walks that graph
//! iteratively until a non-alias declaration is reached.

pub mod naming;

pub use naming::{AliasRequest, NameSource, NamingDecision, choose_external_name};

use crate::error::ResolveError;
use crate::graph::DeclarationGraph;
use crate::types::DeclId;
use rayon::prelude::*;
use std::collections::HashMap;

/// Upper bound on alias hops when no setting overrides it
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 64;

/// Outgoing edge of an alias node
#[derive(Debug, Clone, PartialEq, Eq)]
enum AliasEdge {
    Resolved(DeclId),
    /// Target name does not match any declaration in the run
    Dangling(String),
}

/// A fully resolved alias chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasChain {
    /// Aliases walked, starting alias first
    pub aliases: Vec<DeclId>,
    /// The non-alias declaration the chain ends at
    pub target: DeclId,
}

impl AliasChain {
    pub fn start(&self) -> DeclId {
        self.aliases[0]
    }

    pub fn depth(&self) -> usize {
        self.aliases.len()
    }
}

pub type AliasResolutions = HashMap<DeclId, Result<AliasChain, ResolveError>>;

pub struct AliasGraph<'g> {
    graph: &'g DeclarationGraph,
    edges: HashMap<DeclId, AliasEdge>,
    max_depth: usize,
}

impl<'g> AliasGraph<'g> {
    pub fn new(graph: &'g DeclarationGraph, max_depth: usize) -> Self {
        let edges = graph
            .aliases()
            .map(|alias| {
                let target = alias.target.as_deref().unwrap_or_default();
                let edge = match graph.lookup(target) {
                    Some(id) => AliasEdge::Resolved(id),
                    None => AliasEdge::Dangling(target.to_string()),
                };
                (alias.id, edge)
            })
            .collect();

        Self {
            graph,
            edges,
            max_depth: max_depth.max(1),
        }
    }

    /// Immediate target of an alias, if it resolves to a declaration.
    pub fn direct_target(&self, alias: DeclId) -> Option<DeclId> {
        match self.edges.get(&alias)? {
            AliasEdge::Resolved(id) => Some(*id),
            AliasEdge::Dangling(_) => None,
        }
    }

    /// Follow `start` to its non-alias target.
    ///
    /// Non-alias declarations resolve to themselves with an empty chain prefix.
    pub fn resolve(&self, start: DeclId) -> Result<AliasChain, ResolveError> {
        if !self.graph.declaration(start).is_alias() {
            return Ok(AliasChain {
                aliases: Vec::new(),
                target: start,
            });
        }

        let mut path = vec![start];
        let mut position: HashMap<DeclId, usize> = HashMap::from([(start, 0)]);
        let mut current = start;

        loop {
            let next = match self.edges.get(&current) {
                Some(AliasEdge::Resolved(id)) => *id,
                Some(AliasEdge::Dangling(target)) => {
                    return Err(ResolveError::UnresolvedAlias {
                        alias: self.graph.declaration(current).name.clone(),
                        target: target.clone(),
                    });
                }
                None => {
                    return Err(ResolveError::UnresolvedAlias {
                        alias: self.graph.declaration(current).name.clone(),
                        target: String::new(),
                    });
                }
            };

            if !self.graph.declaration(next).is_alias() {
                return Ok(AliasChain {
                    aliases: path,
                    target: next,
                });
            }

            if let Some(&pos) = position.get(&next) {
                return Err(ResolveError::CyclicAlias {
                    cycle: self.cycle_names(&path[pos..]),
                });
            }

            if path.len() >= self.max_depth {
                return Err(ResolveError::AliasChainTooLong {
                    alias: self.graph.declaration(start).name.clone(),
                    limit: self.max_depth,
                });
            }

            position.insert(next, path.len());
            path.push(next);
            current = next;
        }
    }

    /// Resolve every alias in the graph in parallel on the current rayon pool.
    pub fn resolve_all(&self) -> AliasResolutions {
        let starts: Vec<DeclId> = self.edges.keys().copied().collect();
        let resolutions: AliasResolutions = starts
            .into_par_iter()
            .map(|alias| (alias, self.resolve(alias)))
            .collect();

        tracing::debug!(
            aliases = resolutions.len(),
            failed = resolutions.values().filter(|r| r.is_err()).count(),
            "alias resolution finished"
        );
        resolutions
    }

    /// Names of a cycle, rotated to start at its lowest id so every walk
    /// that hits the same loop reports it identically.
    fn cycle_names(&self, cycle: &[DeclId]) -> Vec<String> {
        let start = cycle
            .iter()
            .enumerate()
            .min_by_key(|(_, id)| **id)
            .map(|(i, _)| i)
            .unwrap_or(0);

        cycle[start..]
            .iter()
            .chain(&cycle[..start])
            .map(|id| self.graph.declaration(*id).name.clone())
            .collect()
    }
}
