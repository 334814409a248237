//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - a plan was produced (warnings do not affect the code)
//! - `1`: General error - unspecified failure
//! - `4`: The graph file could not be parsed or is inconsistent
//! - `5`: File I/O error
//! - `6`: Configuration error
//! - `9`: The graph resolved, but the exposure plan is invalid
//! - `126-255`: Reserved by shell

use crate::error::GraphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Graph file malformed or inconsistent (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Resolution collected one or more errors (code 9)
    PlanInvalid = 9,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Map a graph loading failure to its exit code.
    pub fn from_graph_error(error: &GraphError) -> Self {
        match error {
            GraphError::FileRead { .. } => ExitCode::IoError,
            _ => ExitCode::ParseError,
        }
    }

    /// Exit code for the outcome of a resolution run.
    pub fn from_plan<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => ExitCode::Success,
            Err(_) => ExitCode::PlanInvalid,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}
