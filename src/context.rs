//! Per-run state shared by every engine component

use crate::config::{DefaultVisibility, ResolutionConfig};
use crate::graph::DeclarationGraph;
use std::sync::Arc;

/// Everything one resolution run needs: the graph, its module set, and settings.
///
/// Nothing outlives the run; two runs never share mutable state.
#[derive(Clone)]
pub struct RunContext {
    graph: Arc<DeclarationGraph>,
    resolution: ResolutionConfig,
}

impl RunContext {
    pub fn new(graph: DeclarationGraph, resolution: ResolutionConfig) -> Self {
        Self::from_shared(Arc::new(graph), resolution)
    }

    pub fn from_shared(graph: Arc<DeclarationGraph>, resolution: ResolutionConfig) -> Self {
        Self { graph, resolution }
    }

    pub fn graph(&self) -> &DeclarationGraph {
        &self.graph
    }

    pub fn shared_graph(&self) -> Arc<DeclarationGraph> {
        Arc::clone(&self.graph)
    }

    pub fn resolution(&self) -> &ResolutionConfig {
        &self.resolution
    }

    /// Whether a declaration with no visibility annotation anywhere is exposed.
    pub fn exposes_by_default(&self) -> bool {
        self.resolution.default_visibility == DefaultVisibility::Visible
    }
}
