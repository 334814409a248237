//! End-to-end resolution run
//!
//! Extraction and alias resolution fan out over a rayon pool. Their results
//! are reduced by a single-threaded [`PlanBuilder`] in traversal order, so the
//! plan does not depend on the thread count.

use crate::alias::{AliasGraph, AliasResolutions};
use crate::annotation::{AnnotationExtractor, ExtractionOutcome};
use crate::context::RunContext;
use crate::error::PlanResult;
use crate::plan::{ExposurePlan, PlanBuilder};
use std::time::Instant;

/// Resolve every declaration of the run into a finalized exposure plan.
pub fn resolve(ctx: &RunContext) -> PlanResult<ExposurePlan> {
    let started = Instant::now();
    let graph = ctx.graph();
    tracing::info!(
        modules = graph.module_count(),
        declarations = graph.declaration_count(),
        threads = ctx.resolution().parallel_threads,
        "resolving declaration graph"
    );

    let (extraction, aliases) = run_parallel_phases(ctx);

    let mut builder = PlanBuilder::new(ctx, &extraction, &aliases);
    for module in graph.modules() {
        builder.visit_module(module);
        for &id in &module.declarations {
            builder.visit(id);
        }
    }
    let plan = builder.finalize();

    tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "resolution finished");
    plan
}

fn run_parallel_phases(ctx: &RunContext) -> (ExtractionOutcome, AliasResolutions) {
    let phases = || {
        let graph = ctx.graph();
        let extraction = AnnotationExtractor::extract_all(graph);
        tracing::debug!(
            cached = extraction.cache.declaration_count(),
            errors = extraction.error_count(),
            "annotations extracted"
        );

        let aliases = AliasGraph::new(graph, ctx.resolution().max_alias_depth).resolve_all();
        tracing::debug!(aliases = aliases.len(), "alias chains resolved");
        (extraction, aliases)
    };

    let threads = ctx.resolution().parallel_threads.max(1);
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(phases),
        Err(e) => {
            tracing::warn!("failed to build a {threads}-thread pool, using the global pool: {e}");
            phases()
        }
    }
}
