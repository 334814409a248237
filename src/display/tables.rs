//! Table formatting for plans and diagnostics.

use super::theme::THEME;
use crate::error::{PlanInvalid, Warning};
use crate::plan::{ExposureKind, PlanReport};
use comfy_table::{
    Attribute, Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        Self { table }
    }

    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.table.add_row(row);
        self
    }

    pub fn build(self) -> String {
        self.table.to_string()
    }
}

fn exposure_cell(exposure: ExposureKind) -> Cell {
    let (text, color) = match exposure {
        ExposureKind::Direct => ("direct", Color::Green),
        ExposureKind::Relocated => ("relocated", Color::Magenta),
        ExposureKind::ForwardedAlias => ("via alias", Color::Cyan),
    };
    Cell::new(text).fg(color)
}

/// One row per plan entry.
pub fn create_plan_table(report: &PlanReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec![
        Cell::new("Declaration").add_attribute(Attribute::Bold),
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("External name").add_attribute(Attribute::Bold),
        Cell::new("Emitted in").add_attribute(Attribute::Bold),
        Cell::new("Exposure").add_attribute(Attribute::Bold),
        Cell::new("Forwarded aliases").add_attribute(Attribute::Bold),
    ]);

    for entry in &report.entries {
        let forwarded = entry
            .forwarded
            .iter()
            .map(|f| format!("{}::{}", f.module, f.name))
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            Cell::new(&entry.declaration),
            Cell::new(entry.kind),
            Cell::new(&entry.external_name).add_attribute(Attribute::Bold),
            Cell::new(&entry.emission_module),
            exposure_cell(entry.exposure),
            Cell::new(forwarded),
        ]);
    }

    table.to_string()
}

/// Imports of every module that has any, with their origin.
pub fn create_imports_table(report: &PlanReport) -> String {
    let mut builder = TableBuilder::new().set_headers(vec!["Module", "Imports", "Origin"]);

    for module in report.modules.iter().filter(|m| !m.imports.is_empty()) {
        for import in &module.imports {
            let origin = match &import.via {
                Some(via) => format!("{} ({via})", import.origin),
                None => import.origin.to_string(),
            };
            builder = builder.add_row(vec![module.name.clone(), import.module.clone(), origin]);
        }
    }

    builder.build()
}

/// One line per `expose_here` relocation, with styled names.
pub fn format_relocations(report: &PlanReport) -> String {
    let mut lines = vec![THEME.section("Relocations")];
    for relocation in &report.relocations {
        lines.push(format!(
            "  {} from {} to {} via {}",
            THEME.declaration_name(&relocation.declaration),
            THEME.module_name(&relocation.home),
            THEME.module_name(&relocation.site),
            THEME.declaration_name(&relocation.via),
        ));
    }
    lines.join("\n")
}

pub fn create_error_table(invalid: &PlanInvalid) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec![
        Cell::new("Code").add_attribute(Attribute::Bold),
        Cell::new("Problem").add_attribute(Attribute::Bold),
    ]);

    for error in &invalid.errors {
        table.add_row(vec![
            Cell::new(error.status_code()).fg(Color::Red),
            Cell::new(error.to_string()),
        ]);
    }

    table.to_string()
}

pub fn create_warning_table(warnings: &[Warning]) -> String {
    let mut builder = TableBuilder::new().set_headers(vec!["Code", "Warning"]);
    for warning in warnings {
        builder = builder.add_row(vec![warning.status_code().to_string(), warning.to_string()]);
    }
    builder.build()
}
