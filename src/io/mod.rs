//! Input/Output handling for the CLI.
//!
//! This module provides:
//! - Exit codes scripts can branch on
//! - The JSON response envelope used by `--format json`

pub mod exit_code;
pub mod format;

pub use exit_code::ExitCode;
pub use format::{ErrorDetails, JsonResponse};
