//! Data models for outline extraction
//!
//! This module defines the core data structures shared by the script and JSON
//! extractors: the typed tree node, the language tags, and the scan result
//! types consumed by the output formatters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Supported input languages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    PowerShell,
    Json,
}

impl Language {
    /// Determine language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ps1" | "psm1" => Some(Language::PowerShell),
            "json" => Some(Language::Json),
            _ => None,
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::PowerShell => "PowerShell",
            Language::Json => "JSON",
        }
    }
}

/// Types of structural nodes that can appear in an outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // File system
    File,
    Folder,

    // Script structure
    Class,
    Function,
    Container,
    Parameter,
    Variable,

    // JSON structure
    Object,
    ArrayItem,
    Property,

    // Degraded extraction
    Error,
}

impl NodeKind {
    /// Get human-readable label for the node kind
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
            NodeKind::Class => "class",
            NodeKind::Function => "function",
            NodeKind::Container => "container",
            NodeKind::Parameter => "parameter",
            NodeKind::Variable => "variable",
            NodeKind::Object => "object",
            NodeKind::ArrayItem => "item",
            NodeKind::Property => "property",
            NodeKind::Error => "error",
        }
    }

    /// Check if this kind comes from source structure rather than the file tree
    pub fn is_structural(&self) -> bool {
        !matches!(self, NodeKind::File | NodeKind::Folder)
    }
}

/// A single element in the outline tree
///
/// Nodes are built once during extraction and never mutated afterwards;
/// only the display layer toggles `expanded`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Display label; property and variable labels embed the formatted value
    pub name: String,

    /// Originating file path (informational only)
    pub path: PathBuf,

    /// Kind of structural element
    pub kind: NodeKind,

    /// Nesting depth, used only for display indentation
    pub level: usize,

    /// Whether children are shown by the display layer
    #[serde(default)]
    pub expanded: bool,

    /// Raw text lines belonging to this node (function bodies, JSON summaries)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,

    /// Child nodes in discovery order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new node with no lines or children
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        kind: NodeKind,
        level: usize,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            level,
            expanded: false,
            lines: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Count nodes in this subtree, including self
    pub fn total_nodes(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_nodes()).sum::<usize>()
    }

    /// Flatten the subtree into a pre-order list, ignoring `expanded`
    pub fn flatten(&self) -> Vec<&Node> {
        let mut result = vec![self];
        for child in &self.children {
            result.extend(child.flatten());
        }
        result
    }
}

/// Lazy pre-order traversal over a forest that honors `expanded` flags
///
/// A node is always yielded; its children are visited only while it is
/// expanded. The iterator holds no state beyond a visit stack, so the display
/// layer can recreate it cheaply after any `expanded` toggle.
pub struct VisibleNodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for VisibleNodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if node.expanded {
            for child in node.children.iter().rev() {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

/// Iterate the visible portion of a node forest in display order
pub fn visible_nodes(roots: &[Node]) -> VisibleNodes<'_> {
    VisibleNodes {
        stack: roots.iter().rev().collect(),
    }
}

/// Extraction result for a single source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the scan root
    pub path: PathBuf,

    /// Absolute path to the source file
    pub absolute_path: PathBuf,

    /// Language of the source file
    pub language: Language,

    /// Total number of lines in the file
    pub total_lines: usize,

    /// Root structural nodes extracted from the file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
}

impl FileEntry {
    /// Count structural nodes extracted from this file
    pub fn total_nodes(&self) -> usize {
        self.nodes.iter().map(|n| n.total_nodes()).sum()
    }

    /// Check whether extraction degraded to an error node
    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == NodeKind::Error)
    }
}

/// Complete result of a directory scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineTree {
    /// Scan root directory
    pub root: PathBuf,

    /// Folder/file node tree for the collapsible display
    pub tree: Vec<Node>,

    /// Flat list of extracted files
    pub files: Vec<FileEntry>,

    /// Summary statistics
    pub stats: ScanStats,

    /// Scan metadata
    pub metadata: ScanMetadata,
}

/// Summary statistics for a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total files scanned
    pub total_files: usize,

    /// Total lines across all files
    pub total_lines: usize,

    /// Total structural nodes found
    pub total_nodes: usize,

    /// PowerShell files count
    pub powershell_files: usize,

    /// JSON files count
    pub json_files: usize,

    /// Files whose extraction degraded to an error node
    pub files_with_errors: usize,
}

/// Metadata about the scan operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Duration of scan in milliseconds
    pub scan_duration_ms: u64,

    /// Files processed per second
    pub files_per_second: f64,

    /// ISO timestamp of scan
    pub timestamp: String,

    /// Tool version
    pub tool_version: String,
}
