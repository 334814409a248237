//! Configuration module for the binding planner.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `BP_` and use double underscores
//! to separate nested levels:
//! - `BP_RESOLUTION__MAX_ALIAS_DEPTH=16` sets `resolution.max_alias_depth`
//! - `BP_RESOLUTION__DEFAULT_VISIBILITY=visible` sets `resolution.default_visibility`
//! - `BP_OUTPUT__FORMAT=json` sets `output.format`

use crate::alias::DEFAULT_MAX_ALIAS_DEPTH;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Resolution engine settings
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// Output rendering settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Visibility of declarations that carry no visibility annotation at any scope
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResolutionConfig {
    /// Maximum number of aliases walked before a chain is rejected
    #[serde(default = "default_max_alias_depth")]
    pub max_alias_depth: usize,

    #[serde(default = "default_visibility")]
    pub default_visibility: DefaultVisibility,

    /// Number of threads for extraction and alias resolution
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: OutputFormat,

    /// Print warnings in table output
    #[serde(default = "default_true")]
    pub show_warnings: bool,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}
fn default_max_alias_depth() -> usize {
    DEFAULT_MAX_ALIAS_DEPTH
}
fn default_visibility() -> DefaultVisibility {
    DefaultVisibility::Hidden
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            resolution: ResolutionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_alias_depth: default_max_alias_depth(),
            default_visibility: default_visibility(),
            parallel_threads: default_parallel_threads(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            show_warnings: true,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".bindplan/settings.toml"));

        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file, still honoring `BP_` overrides
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore (__) separates nested levels
            .merge(Env::prefixed("BP_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.bindplan/settings.toml` from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".bindplan");
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments under `root`
    pub fn init_config_file(
        root: impl AsRef<std::path::Path>,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.as_ref().join(".bindplan/settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# bindplan configuration

# Version of the configuration schema
version = 1

# Global debug mode (verbose logging)
debug = false

[resolution]
# Longest alias chain accepted before reporting AliasChainTooLong
max_alias_depth = {DEFAULT_MAX_ALIAS_DEPTH}

# Visibility of declarations without any visibility annotation: "hidden" or "visible"
default_visibility = "hidden"

# Threads used for annotation extraction and alias resolution (defaults to CPU count)
# parallel_threads = {}

[output]
# "table" or "json"
format = "table"

# Print warnings (import cycles, self imports) after the plan
show_warnings = true
"#,
            num_cpus::get()
        );

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
