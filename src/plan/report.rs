//! Name-resolved, serializable view of an exposure plan

use super::{ExposureKind, ExposurePlan};
use crate::error::Warning;
use crate::graph::DeclarationGraph;
use crate::modules::ImportOrigin;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub entries: Vec<EntryReport>,
    pub modules: Vec<ModuleReport>,
    pub relocations: Vec<RelocationReport>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub declaration: String,
    pub kind: &'static str,
    pub external_name: String,
    pub exposure: ExposureKind,
    pub home_module: String,
    pub emission_module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_by: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forwarded: Vec<ForwardedReport>,
}

#[derive(Debug, Serialize)]
pub struct ForwardedReport {
    pub alias: String,
    pub module: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub module: String,
    /// `explicit` or `inferred`
    pub origin: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub imports: Vec<ImportReport>,
    pub manual_blocks: usize,
    pub emitted: usize,
}

#[derive(Debug, Serialize)]
pub struct RelocationReport {
    pub declaration: String,
    pub home: String,
    pub site: String,
    pub via: String,
}

impl PlanReport {
    pub fn new(plan: &ExposurePlan, graph: &DeclarationGraph) -> Self {
        let decl_name = |id| graph.declaration(id).name.clone();
        let module_name = |id| graph.module(id).name.clone();

        let entries = plan
            .entries()
            .iter()
            .map(|entry| EntryReport {
                declaration: entry.qualified_name.clone(),
                kind: entry.kind.as_str(),
                external_name: entry.external_name.clone(),
                exposure: entry.exposure,
                home_module: module_name(entry.home_module),
                emission_module: module_name(entry.emission_module),
                named_by: entry.named_by.map(decl_name),
                forwarded: entry
                    .forwarded
                    .iter()
                    .map(|f| ForwardedReport {
                        alias: decl_name(f.alias),
                        module: module_name(f.module),
                        name: f.name.clone(),
                    })
                    .collect(),
            })
            .collect();

        let modules = plan
            .modules()
            .iter()
            .map(|module| ModuleReport {
                name: module.name.clone(),
                imports: module
                    .imports
                    .iter()
                    .map(|import| match import.origin {
                        ImportOrigin::Explicit => ImportReport {
                            module: module_name(import.module),
                            origin: "explicit",
                            via: None,
                        },
                        ImportOrigin::Inferred { via } => ImportReport {
                            module: module_name(import.module),
                            origin: "inferred",
                            via: Some(decl_name(via)),
                        },
                    })
                    .collect(),
                manual_blocks: module.manual_blocks.len(),
                emitted: plan.emitted_in(module.id).count(),
            })
            .collect();

        let relocations = plan
            .relocations()
            .iter()
            .map(|r| RelocationReport {
                declaration: decl_name(r.declaration),
                home: module_name(r.home),
                site: module_name(r.site),
                via: decl_name(r.via),
            })
            .collect();

        Self {
            entries,
            modules,
            relocations,
            warnings: plan.warnings().to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
