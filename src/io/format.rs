//! JSON envelope shared by every command's machine-readable output.

use crate::error::{GraphError, PlanInvalid};
use crate::io::exit_code::ExitCode;
use serde::Serialize;

/// Standard JSON response format.
///
/// Success and failure share one shape so scripts can branch on `status`
/// and `exit_code` alone.
#[derive(Debug, Serialize)]
pub struct JsonResponse<T = serde_json::Value>
where
    T: Serialize,
{
    /// "success" or "error"
    pub status: String,

    /// Result code (e.g., "OK", "PLAN_INVALID", "GRAPH_PARSE_ERROR")
    pub code: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error details and suggestions (only for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,

    pub exit_code: u8,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            code: "OK".to_string(),
            message: "Exposure plan resolved".to_string(),
            data: Some(data),
            error: None,
            exit_code: ExitCode::Success as u8,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl JsonResponse<serde_json::Value> {
    /// Every collected resolution error goes into `error.context`.
    pub fn from_plan_invalid(invalid: &PlanInvalid) -> Self {
        let mut suggestions: Vec<String> = Vec::new();
        for error in &invalid.errors {
            for suggestion in error.recovery_suggestions() {
                if !suggestions.iter().any(|s| s == suggestion) {
                    suggestions.push(suggestion.to_string());
                }
            }
        }

        Self {
            status: "error".to_string(),
            code: invalid.status_code(),
            message: format!("Exposure plan is invalid ({} error(s))", invalid.errors.len()),
            data: None,
            error: Some(ErrorDetails {
                suggestions,
                context: serde_json::to_value(&invalid.errors).ok(),
            }),
            exit_code: ExitCode::PlanInvalid as u8,
        }
    }

    pub fn from_graph_error(error: &GraphError) -> Self {
        Self {
            status: "error".to_string(),
            code: error.status_code(),
            message: error.to_string(),
            data: None,
            error: Some(ErrorDetails {
                suggestions: error
                    .recovery_suggestions()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                context: None,
            }),
            exit_code: ExitCode::from_graph_error(error) as u8,
        }
    }
}
