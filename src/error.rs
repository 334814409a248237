//! Error types for the declaration resolution engine
//!
//! This module provides structured error types using thiserror. Resolution
//! errors are collected per declaration and surfaced together through
//! [`PlanInvalid`], so one run reports every problem in the graph.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving a single declaration, module or entity
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveError {
    /// Directive attached somewhere it cannot apply, or with a bad payload
    #[error("Malformed '{directive}' annotation on '{declaration}': {reason}")]
    MalformedAnnotation {
        declaration: String,
        directive: String,
        reason: String,
    },

    #[error("Unknown annotation '{tag}' on '{declaration}'")]
    UnknownAnnotation { declaration: String, tag: String },

    /// Alias chain revisits a node; `cycle` lists every alias on the loop
    #[error("Cyclic alias chain: {}", format_cycle(.cycle))]
    CyclicAlias { cycle: Vec<String> },

    #[error("Alias chain starting at '{alias}' exceeds the maximum depth of {limit}")]
    AliasChainTooLong { alias: String, limit: usize },

    #[error("Alias '{alias}' targets '{target}', which is not a known declaration")]
    UnresolvedAlias { alias: String, target: String },

    #[error(
        "Ambiguous encouragement for '{target}': encouraged by {}",
        .aliases.join(", ")
    )]
    AmbiguousEncouragement {
        target: String,
        aliases: Vec<String>,
    },

    #[error("Conflicting visibility annotations on '{declaration}'")]
    ConflictingVisibility { declaration: String },

    #[error(
        "Manual code in module '{module}' imports '{referenced}' without an import annotation"
    )]
    MissingImportDeclaration { module: String, referenced: String },

    #[error("Module '{module}' imports '{target}', which is not part of this run")]
    DanglingImport { module: String, target: String },

    #[error("'{declaration}' would be emitted in more than one module: {}", .sites.join(", "))]
    DuplicateEmission {
        declaration: String,
        sites: Vec<String>,
    },
}

impl ResolveError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::MalformedAnnotation { .. } => "MALFORMED_ANNOTATION",
            Self::UnknownAnnotation { .. } => "UNKNOWN_ANNOTATION",
            Self::CyclicAlias { .. } => "CYCLIC_ALIAS",
            Self::AliasChainTooLong { .. } => "ALIAS_CHAIN_TOO_LONG",
            Self::UnresolvedAlias { .. } => "UNRESOLVED_ALIAS",
            Self::AmbiguousEncouragement { .. } => "AMBIGUOUS_ENCOURAGEMENT",
            Self::ConflictingVisibility { .. } => "CONFLICTING_VISIBILITY",
            Self::MissingImportDeclaration { .. } => "MISSING_IMPORT_DECLARATION",
            Self::DanglingImport { .. } => "DANGLING_IMPORT",
            Self::DuplicateEmission { .. } => "DUPLICATE_EMISSION",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::MalformedAnnotation { .. } => vec![
                "Check which declaration kinds accept the directive",
                "'manual' and 'import' belong on a namespace or module scope",
            ],
            Self::UnknownAnnotation { .. } => vec![
                "Recognized directives: visible, hidden, encourage, expose_here, manual, import",
            ],
            Self::CyclicAlias { .. } => vec!["Break the loop by pointing one alias at a concrete type"],
            Self::AliasChainTooLong { .. } => vec![
                "Point the alias closer to its final target",
                "Raise resolution.max_alias_depth if the chain is intentional",
            ],
            Self::UnresolvedAlias { .. } => {
                vec!["Make sure the module defining the target is part of the run"]
            }
            Self::AmbiguousEncouragement { .. } => {
                vec!["Keep 'encourage' on exactly one alias per target"]
            }
            Self::ConflictingVisibility { .. } => {
                vec!["Remove either 'visible' or 'hidden' from the declaration"]
            }
            Self::MissingImportDeclaration { .. } => {
                vec!["Add an 'import' annotation for the referenced module"]
            }
            Self::DanglingImport { .. } => vec![
                "Add the imported module to the run",
                "Remove the stale 'import' annotation",
            ],
            Self::DuplicateEmission { .. } => {
                vec!["Keep 'expose_here' on aliases from a single module per target"]
            }
        }
    }
}

fn format_cycle(cycle: &[String]) -> String {
    let mut out = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        out.push_str(" -> ");
        out.push_str(first);
    }
    out
}

/// Aggregate failure of a run: the complete set of collected errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", format_plan_errors(.errors))]
pub struct PlanInvalid {
    pub errors: Vec<ResolveError>,
}

impl PlanInvalid {
    pub fn new(errors: Vec<ResolveError>) -> Self {
        Self { errors }
    }

    pub fn status_code(&self) -> String {
        "PLAN_INVALID".to_string()
    }

    /// Errors of one kind, by status code.
    pub fn errors_with_code<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a ResolveError> + 'a {
        self.errors.iter().filter(move |e| e.status_code() == code)
    }
}

fn format_plan_errors(errors: &[ResolveError]) -> String {
    let mut msg = format!("Exposure plan is invalid ({} error(s)):\n", errors.len());
    for error in errors {
        msg.push_str(&format!("  [{}] {error}\n", error.status_code()));
    }
    msg
}

/// Errors raised while building or loading a declaration graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Declaration '{name}' is defined more than once")]
    DuplicateDeclaration { name: String },

    #[error("Module '{name}' is listed more than once")]
    DuplicateModule { name: String },

    #[error("Declaration '{declaration}' belongs to unknown module '{module}'")]
    UnknownModule { declaration: String, module: String },

    #[error("Declaration '{declaration}' is nested in unknown namespace '{parent}'")]
    UnknownParent { declaration: String, parent: String },

    #[error("Declaration '{declaration}' is nested in '{parent}', which is not a namespace")]
    ParentNotNamespace { declaration: String, parent: String },

    #[error("Parent chain of '{declaration}' loops back to '{parent}'")]
    CyclicParent { declaration: String, parent: String },

    #[error("Alias '{declaration}' has no target")]
    MissingAliasTarget { declaration: String },

    #[error("Declaration '{declaration}' is not an alias but names a target")]
    UnexpectedAliasTarget { declaration: String },

    #[error("Declaration '{declaration}' has unknown kind '{kind}'")]
    InvalidKind { declaration: String, kind: String },

    #[error("Failed to read graph file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse graph file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl GraphError {
    pub fn status_code(&self) -> String {
        match self {
            Self::DuplicateDeclaration { .. } => "DUPLICATE_DECLARATION",
            Self::DuplicateModule { .. } => "DUPLICATE_MODULE",
            Self::UnknownModule { .. } => "UNKNOWN_MODULE",
            Self::UnknownParent { .. } => "UNKNOWN_PARENT",
            Self::ParentNotNamespace { .. } => "PARENT_NOT_NAMESPACE",
            Self::CyclicParent { .. } => "CYCLIC_PARENT",
            Self::MissingAliasTarget { .. } => "MISSING_ALIAS_TARGET",
            Self::UnexpectedAliasTarget { .. } => "UNEXPECTED_ALIAS_TARGET",
            Self::InvalidKind { .. } => "INVALID_KIND",
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Json { .. } => "GRAPH_PARSE_ERROR",
        }
        .to_string()
    }

    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::DuplicateDeclaration { .. } | Self::DuplicateModule { .. } => {
                vec!["Qualified names must be unique across the run"]
            }
            Self::UnknownModule { .. } => vec!["List the module in the graph's 'modules' array"],
            Self::UnknownParent { .. } | Self::ParentNotNamespace { .. } => {
                vec!["A parent must be a namespace declared in the same graph"]
            }
            Self::CyclicParent { .. } => {
                vec!["Namespaces must nest as a tree; check the 'parent' fields along the chain"]
            }
            Self::MissingAliasTarget { .. } | Self::UnexpectedAliasTarget { .. } => {
                vec!["Only declarations of kind 'alias' carry a 'target'"]
            }
            Self::InvalidKind { .. } => {
                vec!["Valid kinds: struct, class, alias, typedef, function, namespace, enum"]
            }
            Self::FileRead { .. } => vec!["Check the file path and permissions"],
            Self::Json { .. } => vec!["Validate the graph file against the documented JSON layout"],
        }
    }
}

/// Non-fatal findings reported alongside a finalized plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Modules importing each other; the host's import order decides whether this loads
    ImportCycle { modules: Vec<String> },
    SelfImport { module: String },
    /// Alias requests exposure of a declaration that is itself marked hidden
    AliasToHidden { alias: String, target: String },
}

impl Warning {
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::ImportCycle { .. } => "IMPORT_CYCLE",
            Self::SelfImport { .. } => "SELF_IMPORT",
            Self::AliasToHidden { .. } => "ALIAS_TO_HIDDEN",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImportCycle { modules } => {
                write!(f, "Import cycle between modules: {}", format_cycle(modules))
            }
            Self::SelfImport { module } => write!(f, "Module '{module}' imports itself"),
            Self::AliasToHidden { alias, target } => {
                write!(f, "Alias '{alias}' exposes '{target}', which is hidden")
            }
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

pub type PlanResult<T> = Result<T, PlanInvalid>;
