//! Output formatting module
//!
//! This module provides formatters for JSON, YAML, and ANSI output of
//! outline trees.

pub mod ansi;
mod json;
mod yaml;

pub use ansi::{format_ansi, format_file_ansi};
pub use json::format_json;
pub use yaml::format_yaml;

use crate::models::OutlineTree;
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
    /// ANSI colored text
    Ansi,
    /// Plain text summary
    Summary,
}

/// Format an outline tree in the specified format
pub fn format_output(data: &OutlineTree, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(data),
        OutputFormat::Yaml => format_yaml(data),
        OutputFormat::Ansi => Ok(format_ansi(data)),
        OutputFormat::Summary => Ok(format_summary(data)),
    }
}

/// Format as plain text summary
fn format_summary(data: &OutlineTree) -> String {
    let mut output = String::new();

    output.push_str("Outline Scan Results\n");
    output.push_str("====================\n\n");
    output.push_str(&format!("Root: {}\n", data.root.display()));
    output.push_str(&format!("Total Files: {}\n", data.stats.total_files));
    output.push_str(&format!("Total Lines: {}\n", data.stats.total_lines));
    output.push_str(&format!("Total Nodes: {}\n", data.stats.total_nodes));
    output.push_str("\nLanguage Breakdown:\n");
    output.push_str(&format!(
        "  PowerShell: {} files\n",
        data.stats.powershell_files
    ));
    output.push_str(&format!("  JSON: {} files\n", data.stats.json_files));

    if data.stats.files_with_errors > 0 {
        output.push_str(&format!(
            "\nFiles with errors: {}\n",
            data.stats.files_with_errors
        ));
    }

    output.push_str("\nFiles:\n");
    for file in &data.files {
        output.push_str(&format!(
            "  {} ({} nodes)\n",
            file.path.display(),
            file.total_nodes()
        ));
    }

    output.push_str(&format!(
        "\nScan Duration: {}ms\n",
        data.metadata.scan_duration_ms
    ));
    output.push_str(&format!(
        "Processing Speed: {:.2} files/sec\n",
        data.metadata.files_per_second
    ));

    output
}
