//! Outline engine module
//!
//! This module provides the directory scanner that drives extraction: file
//! discovery with ignore filtering, parallel per-file parsing, and assembly
//! of the folder/file node tree consumed by the collapsible display.

use crate::config::{IgnoreFilter, ScanConfig};
use crate::models::{FileEntry, Language, Node, NodeKind, OutlineTree, ScanMetadata, ScanStats};
use crate::parsers::{parse_source, ParserError};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Scanner errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Parser error: {0}")]
    ParserError(#[from] ParserError),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Main outline scanner
pub struct OutlineScanner {
    config: ScanConfig,
    ignore_filter: IgnoreFilter,
}

impl OutlineScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let ignore_filter = IgnoreFilter::new(&config)?;
        Ok(Self {
            config,
            ignore_filter,
        })
    }

    /// Scan the configured directory and return the outline tree
    pub fn scan(&self) -> Result<OutlineTree, ScanError> {
        let start = Instant::now();

        let source_files = self.find_source_files()?;

        let files: Vec<FileEntry> = if self.config.threads == 1 {
            source_files
                .into_iter()
                .filter_map(|(path, lang)| self.parse_file(&path, &lang))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| ScanError::ThreadPoolError(e.to_string()))?;

            pool.install(|| {
                source_files
                    .par_iter()
                    .filter_map(|(path, lang)| self.parse_file(path, lang))
                    .collect()
            })
        };

        let tree = build_file_tree(&files);
        let stats = calculate_stats(&files);

        let duration = start.elapsed();
        let file_count = files.len();
        let metadata = ScanMetadata {
            scan_duration_ms: duration.as_millis() as u64,
            files_per_second: if duration.as_secs_f64() > 0.0 {
                file_count as f64 / duration.as_secs_f64()
            } else {
                file_count as f64
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(OutlineTree {
            root: self.config.root.clone(),
            tree,
            files,
            stats,
            metadata,
        })
    }

    /// Find all source files matching the configuration
    fn find_source_files(&self) -> Result<Vec<(PathBuf, Language)>, ScanError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.config.root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(|e| {
                // The root itself is never filtered, even when hidden
                if e.depth() == 0 {
                    return true;
                }
                if e.file_type().is_dir() {
                    return !self.ignore_filter.should_ignore(e.path(), true);
                }
                true
            });

        for entry in walker.filter_map(|e| e.ok()) {
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();

            if self.ignore_filter.should_ignore(path, false) {
                continue;
            }

            if !self
                .ignore_filter
                .matches_language_filter(path, &self.config.language_filter)
            {
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() as usize > self.config.max_file_size {
                    continue;
                }
            }

            if let Some(ext) = path.extension() {
                if let Some(lang) = Language::from_extension(&ext.to_string_lossy()) {
                    files.push((path.to_path_buf(), lang));
                }
            }
        }

        Ok(files)
    }

    /// Parse a single file; unreadable files are skipped
    fn parse_file(&self, path: &Path, language: &Language) -> Option<FileEntry> {
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return None,
        };

        let total_lines = source.lines().count();

        let relative_path = path
            .strip_prefix(&self.config.root)
            .unwrap_or(path)
            .to_path_buf();

        let nodes = match parse_source(&source, &relative_path, language, &self.config.options) {
            Ok(nodes) => nodes,
            Err(_) => Vec::new(),
        };

        let absolute_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        Some(FileEntry {
            path: relative_path,
            absolute_path,
            language: language.clone(),
            total_lines,
            nodes,
        })
    }
}

/// Scan a single file and return its entry
pub fn scan_file(path: &Path, config: &ScanConfig) -> Result<FileEntry, ScanError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            ScanError::ParserError(ParserError::UnsupportedExtension("(none)".to_string()))
        })?;

    let language = Language::from_extension(ext)
        .ok_or_else(|| ScanError::ParserError(ParserError::UnsupportedExtension(ext.to_string())))?;

    let source = fs::read_to_string(path)?;
    let total_lines = source.lines().count();

    let nodes = parse_source(&source, path, &language, &config.options)?;

    let absolute_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    Ok(FileEntry {
        path: path.to_path_buf(),
        absolute_path,
        language,
        total_lines,
        nodes,
    })
}

/// Intermediate directory grouping used while building the display tree
#[derive(Default)]
struct DirGroup {
    folders: BTreeMap<String, DirGroup>,
    files: Vec<(String, Node)>,
}

impl DirGroup {
    fn insert(&mut self, components: &[String], file: Node) {
        match components {
            [name] => self.files.push((name.clone(), file)),
            [folder, rest @ ..] => self
                .folders
                .entry(folder.clone())
                .or_default()
                .insert(rest, file),
            [] => {}
        }
    }

    fn into_nodes(self, depth: usize, prefix: &Path) -> Vec<Node> {
        let mut nodes = Vec::new();

        // Folders first, sorted by name via the BTreeMap
        for (name, group) in self.folders {
            let folder_path = prefix.join(&name);
            let mut folder = Node::new(name.as_str(), &folder_path, NodeKind::Folder, depth);
            folder.children = group.into_nodes(depth + 1, &folder_path);
            nodes.push(folder);
        }

        let mut files = self.files;
        files.sort_by(|a, b| a.0.cmp(&b.0));
        nodes.extend(files.into_iter().map(|(_, node)| node));

        nodes
    }
}

/// Build the folder/file node tree from the extracted entries
///
/// Folder and file names sort alphabetically; structural nodes under each
/// file keep their extraction levels (file-relative).
fn build_file_tree(entries: &[FileEntry]) -> Vec<Node> {
    let mut root = DirGroup::default();

    for entry in entries {
        let components: Vec<String> = entry
            .path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if components.is_empty() {
            continue;
        }

        let name = components
            .last()
            .cloned()
            .unwrap_or_else(|| entry.path.to_string_lossy().into_owned());
        let depth = components.len() - 1;

        let mut file = Node::new(name.as_str(), &entry.path, NodeKind::File, depth);
        file.children = entry.nodes.clone();
        root.insert(&components, file);
    }

    root.into_nodes(0, Path::new(""))
}

/// Calculate scan statistics
fn calculate_stats(files: &[FileEntry]) -> ScanStats {
    let total_files = files.len();
    let total_lines: usize = files.iter().map(|f| f.total_lines).sum();
    let total_nodes: usize = files.iter().map(|f| f.total_nodes()).sum();

    let powershell_files = files
        .iter()
        .filter(|f| f.language == Language::PowerShell)
        .count();
    let json_files = files.iter().filter(|f| f.language == Language::Json).count();

    let files_with_errors = files.iter().filter(|f| f.has_errors()).count();

    ScanStats {
        total_files,
        total_lines,
        total_nodes,
        powershell_files,
        json_files,
        files_with_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();

        let ps_path = root.join("deploy.ps1");
        let mut ps_file = fs::File::create(&ps_path).unwrap();
        writeln!(
            ps_file,
            r#"function Publish-Artifact($Target) {{
    $retries = 3
}}

class Pipeline {{
    Run() {{
        $status = 'ok'
    }}
}}
"#
        )
        .unwrap();

        fs::create_dir(root.join("conf")).unwrap();
        let json_path = root.join("conf").join("settings.json");
        let mut json_file = fs::File::create(&json_path).unwrap();
        writeln!(json_file, r#"{{"name": "demo", "ports": [80, 443]}}"#).unwrap();

        (dir, root)
    }

    #[test]
    fn test_scan_directory() {
        let (_dir, root) = create_test_project();
        let config = ScanConfig::new(root);
        let scanner = OutlineScanner::new(config).unwrap();
        let result = scanner.scan().unwrap();

        assert_eq!(result.stats.total_files, 2);
        assert_eq!(result.stats.powershell_files, 1);
        assert_eq!(result.stats.json_files, 1);
        assert_eq!(result.stats.files_with_errors, 0);
    }

    #[test]
    fn test_scan_single_file() {
        let (_dir, root) = create_test_project();
        let ps_path = root.join("deploy.ps1");
        let config = ScanConfig::default();

        let result = scan_file(&ps_path, &config).unwrap();

        assert_eq!(result.language, Language::PowerShell);
        let names: Vec<&str> = result.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Publish-Artifact", "Pipeline"]);
    }

    #[test]
    fn test_scan_file_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let result = scan_file(&path, &ScanConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_language_filter() {
        let (_dir, root) = create_test_project();
        let config = ScanConfig::new(root).with_language_filter(vec![Language::PowerShell]);
        let scanner = OutlineScanner::new(config).unwrap();
        let result = scanner.scan().unwrap();

        assert_eq!(result.stats.json_files, 0);
        assert_eq!(result.stats.powershell_files, 1);
    }

    #[test]
    fn test_file_tree_shape() {
        let (_dir, root) = create_test_project();
        let config = ScanConfig::new(root).with_threads(1);
        let scanner = OutlineScanner::new(config).unwrap();
        let result = scanner.scan().unwrap();

        // Folder sorts ahead of root-level files
        assert_eq!(result.tree.len(), 2);
        assert_eq!(result.tree[0].kind, NodeKind::Folder);
        assert_eq!(result.tree[0].name, "conf");
        assert_eq!(result.tree[0].children[0].name, "settings.json");
        assert_eq!(result.tree[1].kind, NodeKind::File);
        assert_eq!(result.tree[1].name, "deploy.ps1");

        // Structural nodes hang beneath the file node
        let deploy = &result.tree[1];
        assert_eq!(deploy.children.len(), 2);
        assert_eq!(deploy.children[0].name, "Publish-Artifact");
    }

    #[test]
    fn test_broken_json_counts_as_error_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::write(root.join("bad.json"), "{oops").unwrap();

        let config = ScanConfig::new(root);
        let scanner = OutlineScanner::new(config).unwrap();
        let result = scanner.scan().unwrap();

        assert_eq!(result.stats.total_files, 1);
        assert_eq!(result.stats.files_with_errors, 1);
        assert_eq!(result.files[0].nodes[0].kind, NodeKind::Error);
    }
}
