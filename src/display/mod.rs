//! Terminal rendering for plans, import lists and diagnostics.

pub mod tables;
pub mod theme;

pub use tables::{
    TableBuilder, create_error_table, create_imports_table, create_plan_table,
    create_warning_table, format_relocations,
};
pub use theme::{THEME, Theme};
