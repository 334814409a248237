//! CLI entry point for the binding planner.
//!
//! Loads a declaration graph exported by the C++ front end, resolves it and
//! prints the exposure plan as a table or as JSON.

use anyhow::Context;
use bindplan::config::OutputFormat;
use bindplan::display::{
    THEME, create_error_table, create_imports_table, create_plan_table, create_warning_table,
    format_relocations,
};
use bindplan::io::{ExitCode, JsonResponse};
use bindplan::{PlanReport, RunContext, Settings, load_graph, resolve};
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Resolve annotated C++ declarations into an exposure plan
#[derive(Parser)]
#[command(
    name = "bindplan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Resolve annotated C++ declarations into an exposure plan",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up .bindplan directory with default configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Resolve a graph and print its exposure plan
    #[command(
        after_help = "Examples:\n  bindplan plan graph.json\n  bindplan plan graph.json --format json\n  bindplan plan graph.json --threads 1"
    )]
    Plan {
        /// Declaration graph exported by the front end (JSON)
        graph: PathBuf,

        /// Output format (overrides config)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Number of threads to use (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Resolve a graph and only report whether the plan is valid
    Check {
        graph: PathBuf,
    },

    /// Display active settings
    Config,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown format '{other}', expected 'table' or 'json'")),
    }
}

fn init_tracing(verbose: bool, debug: bool) {
    let level = if verbose || debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings, ExitCode> {
    match path {
        Some(path) => Settings::load_from(path).map_err(|e| {
            eprintln!(
                "{}",
                THEME.error_with_icon(&format!(
                    "Configuration error loading from {}: {e}",
                    path.display()
                ))
            );
            ExitCode::ConfigError
        }),
        None => Ok(Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration.");
            Settings::default()
        })),
    }
}

fn main() {
    let cli = Cli::parse();

    let mut settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(code) => std::process::exit(code.into()),
    };
    init_tracing(cli.verbose, settings.debug);

    let code = match cli.command {
        Commands::Init { force } => run_init(force),
        Commands::Config => run_config(&settings),
        Commands::Plan {
            graph,
            format,
            threads,
        } => {
            if let Some(format) = format {
                settings.output.format = format;
            }
            if let Some(threads) = threads {
                settings.resolution.parallel_threads = threads;
            }
            run_plan(&graph, &settings, false)
        }
        Commands::Check { graph } => run_plan(&graph, &settings, true),
    };

    match code {
        Ok(code) => std::process::exit(code.into()),
        Err(e) => {
            eprintln!("{}", THEME.error_with_icon(&format!("{e:#}")));
            std::process::exit(ExitCode::GeneralError.into());
        }
    }
}

fn run_init(force: bool) -> anyhow::Result<ExitCode> {
    let root = std::env::current_dir().context("cannot determine the current directory")?;
    match Settings::init_config_file(&root, force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            Ok(ExitCode::Success)
        }
        Err(e) => {
            eprintln!("{}", THEME.error_with_icon(&e.to_string()));
            Ok(ExitCode::ConfigError)
        }
    }
}

fn run_config(settings: &Settings) -> anyhow::Result<ExitCode> {
    println!("{}", THEME.section("Current Configuration:"));
    println!("{}", "=".repeat(50));
    let toml_str = toml::to_string_pretty(settings).context("failed to render settings")?;
    println!("{toml_str}");
    Ok(ExitCode::Success)
}

fn run_plan(path: &Path, settings: &Settings, check_only: bool) -> anyhow::Result<ExitCode> {
    let json = settings.output.format == OutputFormat::Json;

    let graph = match load_graph(path) {
        Ok(graph) => graph,
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&JsonResponse::from_graph_error(&e))?);
            } else {
                eprintln!("{}", THEME.error_with_icon(&e.to_string()));
                for suggestion in e.recovery_suggestions() {
                    eprintln!("  {suggestion}");
                }
            }
            return Ok(ExitCode::from_graph_error(&e));
        }
    };

    let ctx = RunContext::new(graph, settings.resolution.clone());
    let result = resolve(&ctx);
    let code = ExitCode::from_plan(&result);

    match result {
        Ok(plan) => {
            let report = PlanReport::new(&plan, ctx.graph());
            if json {
                let response = JsonResponse::success(&report)
                    .with_message(format!("Resolved {} exposure entries", plan.len()));
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else if check_only {
                println!(
                    "{}",
                    THEME.success_with_icon(&format!(
                        "Plan is valid: {} entries, {} warning(s)",
                        plan.len(),
                        plan.warnings().len()
                    ))
                );
            } else {
                println!("{}", create_plan_table(&report));
                if report.modules.iter().any(|m| !m.imports.is_empty()) {
                    println!("{}", create_imports_table(&report));
                }
                if !report.relocations.is_empty() {
                    println!("{}", format_relocations(&report));
                }
            }
            if !json && settings.output.show_warnings && !plan.warnings().is_empty() {
                eprintln!(
                    "{}",
                    THEME.warning_with_icon(&format!("{} warning(s)", plan.warnings().len()))
                );
                eprintln!("{}", create_warning_table(plan.warnings()));
            }
        }
        Err(invalid) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonResponse::from_plan_invalid(&invalid))?
                );
            } else {
                eprintln!(
                    "{}",
                    THEME.error_with_icon(&format!(
                        "Exposure plan is invalid ({} error(s))",
                        invalid.errors.len()
                    ))
                );
                eprintln!("{}", create_error_table(&invalid));
            }
        }
    }

    Ok(code)
}
