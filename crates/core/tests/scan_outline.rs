//! End-to-end scan tests: fixture tree through scanner and formatters

use psoutline_core::{
    format_output, visible_nodes, NodeKind, OutlineScanner, OutputFormat, ScanConfig,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn create_fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    fs::write(
        root.join("tasks.ps1"),
        r#"class TaskRunner {
    [int] Execute($task, [string]$mode) {
        $attempts = 0
        if ($task) {
            $attempts = 1
        }
        return $attempts
    }
}

function Invoke-All {
    param(
        [Parameter(Mandatory=$true)] [string]$Filter
    )
    $count = 0
}
"#,
    )
    .unwrap();

    fs::create_dir(root.join("config")).unwrap();
    fs::write(
        root.join("config").join("app.json"),
        r#"{"name": "runner", "retries": 3, "hosts": ["a", "b"]}"#,
    )
    .unwrap();
    fs::write(root.join("config").join("broken.json"), "{nope").unwrap();

    (dir, root)
}

#[test]
fn test_scan_extracts_script_and_json_structure() {
    let (_dir, root) = create_fixture();
    let scanner = OutlineScanner::new(ScanConfig::new(root)).unwrap();
    let result = scanner.scan().unwrap();

    assert_eq!(result.stats.total_files, 3);
    assert_eq!(result.stats.powershell_files, 1);
    assert_eq!(result.stats.json_files, 2);
    assert_eq!(result.stats.files_with_errors, 1);

    let script = result
        .files
        .iter()
        .find(|f| f.path.ends_with("tasks.ps1"))
        .unwrap();
    let names: Vec<&str> = script.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["TaskRunner", "Invoke-All"]);

    // Method with return type, parameters, and a deduplicated variable
    let method = &script.nodes[0].children[0];
    assert_eq!(method.name, "[int] Execute");
    assert_eq!(method.level, 2);
    let containers: Vec<&str> = method.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(containers, vec!["Parameters (2)", "Variables (1)"]);
    let params: Vec<&str> = method.children[0]
        .children
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(params, vec!["task", "mode : string"]);

    // param() block in the free function
    let func = &script.nodes[1];
    let params: Vec<&str> = func.children[0]
        .children
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(params, vec!["Filter : string"]);

    // JSON structure with preserved order
    let json = result
        .files
        .iter()
        .find(|f| f.path.ends_with("app.json"))
        .unwrap();
    let names: Vec<&str> = json.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["name: runner", "retries: 3", "hosts"]);
    assert_eq!(json.nodes[2].lines, vec!["Array with 2 items"]);

    // Malformed JSON degrades to one error node
    let broken = result
        .files
        .iter()
        .find(|f| f.path.ends_with("broken.json"))
        .unwrap();
    assert_eq!(broken.nodes.len(), 1);
    assert_eq!(broken.nodes[0].kind, NodeKind::Error);
}

#[test]
fn test_formats_render_scan_result() {
    let (_dir, root) = create_fixture();
    let scanner = OutlineScanner::new(ScanConfig::new(root)).unwrap();
    let result = scanner.scan().unwrap();

    for format in [
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Ansi,
        OutputFormat::Summary,
    ] {
        let output = format_output(&result, format).unwrap();
        assert!(output.contains("tasks.ps1"));
    }

    let json = format_output(&result, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["stats"]["total_files"], 3);
}

#[test]
fn test_display_tree_is_collapsed_by_default() {
    let (_dir, root) = create_fixture();
    let scanner = OutlineScanner::new(ScanConfig::new(root)).unwrap();
    let result = scanner.scan().unwrap();

    // Nothing is expanded after a scan, so only top-level entries are visible
    let visible: Vec<&str> = visible_nodes(&result.tree).map(|n| n.name.as_str()).collect();
    assert_eq!(visible, vec!["config", "tasks.ps1"]);
}
