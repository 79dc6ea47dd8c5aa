//! ANSI colored output formatter
//!
//! This module renders the outline tree as colored terminal text.

use crate::models::{FileEntry, Language, Node, NodeKind, OutlineTree};

// ANSI escape codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

const BRIGHT_RED: &str = "\x1b[91m";
const BRIGHT_GREEN: &str = "\x1b[92m";
const BRIGHT_YELLOW: &str = "\x1b[93m";
const BRIGHT_BLUE: &str = "\x1b[94m";
const BRIGHT_CYAN: &str = "\x1b[96m";

const BG_BLUE: &str = "\x1b[44m";

/// Get color for node kind
fn node_kind_color(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::File => BRIGHT_BLUE,
        NodeKind::Folder => BLUE,
        NodeKind::Class => BRIGHT_YELLOW,
        NodeKind::Function => BRIGHT_CYAN,
        NodeKind::Container => DIM,
        NodeKind::Parameter => CYAN,
        NodeKind::Variable => GREEN,
        NodeKind::Object => BRIGHT_GREEN,
        NodeKind::ArrayItem => YELLOW,
        NodeKind::Property => MAGENTA,
        NodeKind::Error => BRIGHT_RED,
    }
}

/// Get marker for node kind
fn node_kind_marker(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::File => "▤",
        NodeKind::Folder => "▸",
        NodeKind::Class => "◆",
        NodeKind::Function => "ƒ",
        NodeKind::Container => "·",
        NodeKind::Parameter => "→",
        NodeKind::Variable => "$",
        NodeKind::Object => "{}",
        NodeKind::ArrayItem => "[]",
        NodeKind::Property => "=",
        NodeKind::Error => "✗",
    }
}

/// Format an outline tree as ANSI colored text
pub fn format_ansi(data: &OutlineTree) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{}{}  Outline Scan Results  {}{}\n\n",
        BOLD, BG_BLUE, RESET, RESET
    ));

    output.push_str(&format!(
        "{}Root:{} {}\n\n",
        BOLD,
        RESET,
        data.root.display()
    ));

    output.push_str(&format!(
        "{}Files:{} {}  {}Lines:{} {}  {}Nodes:{} {}\n\n",
        BOLD,
        RESET,
        data.stats.total_files,
        BOLD,
        RESET,
        data.stats.total_lines,
        BOLD,
        RESET,
        data.stats.total_nodes
    ));

    for node in &data.tree {
        output.push_str(&format_node_ansi(node, 0));
    }

    output.push_str(&format!(
        "\n{}Scan completed in {}ms ({:.2} files/sec){}\n",
        DIM,
        data.metadata.scan_duration_ms,
        data.metadata.files_per_second,
        RESET
    ));

    output
}

/// Format a single file's outline as ANSI colored text
pub fn format_file_ansi(file: &FileEntry) -> String {
    let mut output = String::new();

    let lang_color = match file.language {
        Language::PowerShell => BRIGHT_BLUE,
        Language::Json => BRIGHT_YELLOW,
    };

    output.push_str(&format!(
        "{}{}{}{} {}({}, {} lines){}\n",
        BOLD,
        lang_color,
        file.path.display(),
        RESET,
        DIM,
        file.language.display_name(),
        file.total_lines,
        RESET
    ));

    for node in &file.nodes {
        output.push_str(&format_node_ansi(node, 1));
    }

    output
}

/// Format a single node with indentation
fn format_node_ansi(node: &Node, indent: usize) -> String {
    let mut output = String::new();
    let indent_str = "  ".repeat(indent);

    let color = node_kind_color(&node.kind);
    let marker = node_kind_marker(&node.kind);

    output.push_str(&format!(
        "{}{}{} {}{}{}{}",
        indent_str, color, marker, RESET, BOLD, node.name, RESET
    ));

    // Content summary for JSON composites
    if node.kind == NodeKind::Object || node.kind == NodeKind::ArrayItem {
        if let Some(first) = node.lines.first() {
            if !node.children.is_empty() {
                output.push_str(&format!(" {}{}{}", DIM, first, RESET));
            }
        }
    }

    output.push('\n');

    for child in &node.children {
        output.push_str(&format_node_ansi(child, indent + 1));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::create_test_tree;

    #[test]
    fn test_format_ansi_basic() {
        let data = create_test_tree();
        let output = format_ansi(&data);

        assert!(output.contains("Outline Scan Results"));
        assert!(output.contains("deploy.ps1"));
        assert!(output.contains("Deploy"));
    }

    #[test]
    fn test_format_file_ansi() {
        let data = create_test_tree();
        let output = format_file_ansi(&data.files[0]);

        assert!(output.contains("deploy.ps1"));
        assert!(output.contains("PowerShell"));
    }

    #[test]
    fn test_node_markers() {
        assert_eq!(node_kind_marker(&NodeKind::Function), "ƒ");
        assert_eq!(node_kind_marker(&NodeKind::Class), "◆");
        assert_eq!(node_kind_marker(&NodeKind::Error), "✗");
    }
}
