//! psoutline-core - Core library for structural outline extraction
//!
//! This crate extracts a navigable lexical outline from PowerShell scripts
//! and JSON files: classes, functions, parameters, and variable assignments
//! for scripts, and key/value/array structure for JSON. The result is a
//! forest of typed nodes suited to a collapsible tree display.
//!
//! Script parsing is deliberately line-oriented and regex-based: a
//! best-effort structural outline, not a compiler-grade parse. Malformed
//! input degrades to partial structure instead of failing a file.
//!
//! # Example
//!
//! ```rust,no_run
//! use psoutline_core::{format_output, OutlineScanner, OutputFormat, ScanConfig};
//! use std::path::PathBuf;
//!
//! let config = ScanConfig::new(PathBuf::from("."));
//! let scanner = OutlineScanner::new(config).unwrap();
//!
//! let result = scanner.scan().unwrap();
//!
//! let json = format_output(&result, OutputFormat::Json).unwrap();
//! println!("{}", json);
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod output;
pub mod parsers;

// Re-exports for convenience
pub use config::{ParseOptions, ScanConfig};
pub use engine::{scan_file, OutlineScanner, ScanError};
pub use models::{
    visible_nodes, FileEntry, Language, Node, NodeKind, OutlineTree, ScanMetadata, ScanStats,
    VisibleNodes,
};
pub use output::{format_output, FormatError, OutputFormat};
pub use parsers::{parse_source, JsonStructureExtractor, ParserError, ScriptStructureExtractor};
