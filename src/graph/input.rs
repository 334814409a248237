//! JSON interchange format between the C++ front end and the engine
//!
//! Module order in the document is the run's module order; declaration order
//! is source order.

use super::{DeclarationGraph, DeclarationGraphBuilder, DeclarationSpec, RawAnnotation};
use crate::error::{GraphError, GraphResult};
use crate::types::DeclKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub declarations: Vec<DeclarationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub name: String,
    pub kind: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

impl GraphDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_graph(self) -> GraphResult<DeclarationGraph> {
        let mut builder = DeclarationGraphBuilder::new();

        for module in self.modules {
            builder.add_module(module.name, module.annotations)?;
        }

        for record in self.declarations {
            let kind: DeclKind = record.kind.parse().map_err(|_| GraphError::InvalidKind {
                declaration: record.name.clone(),
                kind: record.kind.clone(),
            })?;

            builder.add_declaration(DeclarationSpec {
                name: record.name,
                kind,
                module: record.module,
                parent: record.parent,
                target: record.target,
                annotations: record.annotations,
            })?;
        }

        builder.build()
    }
}

/// Read and validate a graph document from disk.
pub fn load_graph(path: impl AsRef<Path>) -> GraphResult<DeclarationGraph> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| GraphError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document = GraphDocument::from_json(&content).map_err(|source| GraphError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        modules = document.modules.len(),
        declarations = document.declarations.len(),
        "loaded graph document"
    );

    document.into_graph()
}
