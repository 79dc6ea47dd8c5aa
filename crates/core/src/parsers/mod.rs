//! Parsers module for structural outline extraction
//!
//! Dispatches file content to the script or JSON extractor. Extraction is
//! best-effort by design: the only errors produced here are construction-time
//! pattern failures; malformed input always degrades to partial structure or
//! an error node instead of failing the file.

mod json;
mod script;

pub use json::JsonStructureExtractor;
pub use script::ScriptStructureExtractor;

use crate::config::ParseOptions;
use crate::models::{Language, Node};
use std::path::Path;
use thiserror::Error;

/// Parser errors
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to initialize parser: {0}")]
    InitError(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

/// Parse one file's text into its structural node forest
///
/// JSON deserialization failure is not an error: it yields a single
/// error-kind node carrying the message.
pub fn parse_source(
    source: &str,
    path: &Path,
    language: &Language,
    options: &ParseOptions,
) -> Result<Vec<Node>, ParserError> {
    match language {
        Language::PowerShell => {
            let extractor = ScriptStructureExtractor::new()?;
            let lines: Vec<&str> = source.lines().collect();
            Ok(extractor.extract(&lines, path, options))
        }
        Language::Json => match serde_json::from_str::<serde_json::Value>(source) {
            Ok(value) => Ok(JsonStructureExtractor::new().extract(&value, path, 1)),
            Err(err) => Ok(vec![JsonStructureExtractor::error_node(
                &format!("Invalid JSON: {}", err),
                path,
            )]),
        },
    }
}
