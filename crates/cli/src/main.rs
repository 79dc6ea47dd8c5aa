//! psoutline CLI
//!
//! Command-line front end for structural outlines of PowerShell scripts and
//! JSON files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use psoutline_core::{
    format_output, output::format_file_ansi, scan_file, Language, OutlineScanner, OutputFormat,
    ParseOptions, ScanConfig,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Structural outlines of PowerShell scripts and JSON files
#[derive(Parser)]
#[command(name = "psoutline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Collapsible structural outlines of PowerShell scripts and JSON")]
#[command(long_about = r#"
psoutline: structural outlines of PowerShell scripts and JSON files

Extracts classes, functions, parameters, and variable assignments from
PowerShell sources, and key/value/array structure from JSON documents,
as a nested outline tree.

Supports:
  - PowerShell (.ps1, .psm1)
  - JSON (.json)

Output formats:
  - JSON (default) - Structured JSON for programmatic use
  - YAML - Human-readable YAML format
  - ANSI - Colored terminal output
  - Summary - Plain text digest

Examples:
  psoutline .                      # Scan current directory
  psoutline --format ansi          # Colored terminal output
  psoutline --language powershell  # Only PowerShell files
  psoutline file deploy.ps1        # Single file outline
  psoutline --no-variables .       # Skip variable assignments
"#)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json)]
    pub format: OutputFormatArg,

    /// Language filter
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageFilter>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip parameter extraction
    #[arg(long)]
    pub no_parameter_types: bool,

    /// Skip variable-assignment extraction
    #[arg(long)]
    pub no_variables: bool,

    /// Skip parameter/variable containers entirely
    #[arg(long)]
    pub no_details: bool,

    /// Hide the parameter container even when details are expanded
    #[arg(long)]
    pub hide_parameters: bool,

    /// Hide the variable container even when details are expanded
    #[arg(long)]
    pub hide_variables: bool,

    /// Keep full function bodies instead of signatures only
    #[arg(long)]
    pub full_bodies: bool,

    /// Ignore patterns (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Number of threads for parallel processing (default: auto)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Maximum file size in bytes
    #[arg(long)]
    pub max_file_size: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory for outlines
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Get outline for a single file
    File {
        /// Path to file
        path: PathBuf,
    },
}

/// Output format argument
#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Ansi,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

/// Language filter argument
#[derive(ValueEnum, Clone, Debug)]
pub enum LanguageFilter {
    Powershell,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match &args.command {
        Some(Commands::Scan { path }) => run_scan(path, &args),
        Some(Commands::File { path }) => run_file(path, &args),
        None => run_scan(&args.path, &args),
    }
}

/// Build parsing options from args
fn build_options(args: &Args) -> ParseOptions {
    ParseOptions {
        parse_parameter_types: !args.no_parameter_types,
        parse_variable_assignments: !args.no_variables,
        expand_function_details: !args.no_details,
        show_parameters: !args.hide_parameters,
        show_variables: !args.hide_variables,
        show_function_names: !args.full_bodies,
    }
}

/// Build common configuration from args
fn build_config(path: &PathBuf, args: &Args) -> ScanConfig {
    let language_filter = args.language.as_ref().map(|l| match l {
        LanguageFilter::Powershell => vec![Language::PowerShell],
        LanguageFilter::Json => vec![Language::Json],
    });

    let mut config = ScanConfig::new(path.clone())
        .with_ignore_patterns(args.ignore.clone())
        .with_options(build_options(args));

    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    if let Some(size) = args.max_file_size {
        config = config.with_max_file_size(size);
    }

    if let Some(languages) = language_filter {
        config = config.with_language_filter(languages);
    }

    config
}

fn run_scan(path: &PathBuf, args: &Args) -> Result<()> {
    let config = build_config(path, args);

    let spinner = if args.verbose && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning...");
        Some(pb)
    } else {
        None
    };

    let scanner = OutlineScanner::new(config).context("Failed to create scanner")?;
    let result = scanner.scan().context("Failed to scan directory")?;

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Scanned {} files in {}ms",
            result.stats.total_files, result.metadata.scan_duration_ms
        ));
    }

    let format: OutputFormat = args.format.clone().into();
    let output = format_output(&result, format)?;

    write_output(&output, args.output.as_ref())?;

    Ok(())
}

fn run_file(path: &PathBuf, args: &Args) -> Result<()> {
    let config = build_config(path, args);

    let entry = scan_file(path, &config).context("Failed to parse file")?;

    let format: OutputFormat = args.format.clone().into();
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&entry)?,
        OutputFormat::Yaml => serde_yaml::to_string(&entry)?,
        OutputFormat::Ansi => format_file_ansi(&entry),
        OutputFormat::Summary => format_file_summary(&entry),
    };

    write_output(&output, args.output.as_ref())?;

    Ok(())
}

fn write_output(output: &str, path: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, output).context("Failed to write output file")?;
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn format_file_summary(entry: &psoutline_core::FileEntry) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", entry.path.display()));
    output.push_str(&format!("Language: {}\n", entry.language.display_name()));
    output.push_str(&format!("Lines: {}\n", entry.total_lines));
    output.push_str(&format!("Nodes: {}\n", entry.total_nodes()));

    output.push_str("\nOutline:\n");
    for node in &entry.nodes {
        output.push_str(&format_node_summary(node, 1));
    }

    output
}

fn format_node_summary(node: &psoutline_core::Node, indent: usize) -> String {
    let mut output = String::new();
    let indent_str = "  ".repeat(indent);

    output.push_str(&format!(
        "{}{} {}\n",
        indent_str,
        node.kind.label(),
        node.name
    ));

    for child in &node.children {
        output.push_str(&format_node_summary(child, indent + 1));
    }

    output
}
