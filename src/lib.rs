//! Declaration resolution engine for annotation-driven binding generators

pub mod alias;
pub mod annotation;
pub mod config;
pub mod context;
pub mod display;
pub mod engine;
pub mod error;
pub mod graph;
pub mod io;
pub mod modules;
pub mod plan;
pub mod types;

// Explicit exports for better API clarity
pub use alias::{AliasChain, AliasGraph, AliasResolutions};
pub use annotation::{Annotation, AnnotationExtractor, AnnotationSet, Directive};
pub use config::Settings;
pub use context::RunContext;
pub use engine::resolve;
pub use error::{
    GraphError, GraphResult, PlanInvalid, PlanResult, ResolveError, Warning,
};
pub use graph::{
    DeclarationGraph, DeclarationGraphBuilder, DeclarationSpec, GraphDocument, RawAnnotation,
    load_graph,
};
pub use modules::{CrossModuleResolver, ImportOrigin, ModuleImport};
pub use plan::{ExposureKind, ExposurePlan, PlanEntry, PlanReport};
pub use types::{DeclId, DeclKind, ModuleId};
