//! Configuration module for the outline scanner
//!
//! This module provides the parsing options consumed by the extractors, the
//! scanner configuration, and ignore filtering logic for controlling which
//! files are processed.

use crate::models::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Toggles controlling how much detail the extractors produce
///
/// An immutable value passed explicitly into every extraction call; the
/// extractors never consult shared state.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Extract parameter lists (inline and `param(` blocks) with type labels
    pub parse_parameter_types: bool,

    /// Extract `$name =` variable assignments from function bodies
    pub parse_variable_assignments: bool,

    /// Attach parameter/variable container nodes under functions
    pub expand_function_details: bool,

    /// Include the parameter container when details are expanded
    pub show_parameters: bool,

    /// Include the variable container when details are expanded
    pub show_variables: bool,

    /// Keep only function signatures; when false, full body text is retained
    pub show_function_names: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            parse_parameter_types: true,
            parse_variable_assignments: true,
            expand_function_details: true,
            show_parameters: true,
            show_variables: true,
            show_function_names: true,
        }
    }
}

impl ParseOptions {
    /// Options that produce bare structure with no detail nodes
    pub fn structure_only() -> Self {
        Self {
            parse_parameter_types: false,
            parse_variable_assignments: false,
            expand_function_details: false,
            show_parameters: false,
            show_variables: false,
            show_function_names: true,
        }
    }
}

/// Configuration for the outline scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan
    pub root: PathBuf,

    /// Language filter (None = all languages)
    pub language_filter: Option<Vec<Language>>,

    /// Custom ignore patterns
    pub ignore_patterns: Vec<String>,

    /// Number of threads for parallel processing
    pub threads: usize,

    /// Maximum file size to process (bytes)
    pub max_file_size: usize,

    /// Parsing options passed to the extractors
    pub options: ParseOptions,

    /// Whether to follow symlinks
    pub follow_symlinks: bool,

    /// Whether to include hidden files
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            language_filter: None,
            ignore_patterns: Vec::new(),
            threads: num_cpus(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            options: ParseOptions::default(),
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

impl ScanConfig {
    /// Create new config with root directory
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Set language filter (builder pattern)
    pub fn with_language_filter(mut self, languages: Vec<Language>) -> Self {
        self.language_filter = Some(languages);
        self
    }

    /// Set ignore patterns (builder pattern)
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set number of threads (builder pattern)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set max file size (builder pattern)
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set parsing options (builder pattern)
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Set follow symlinks (builder pattern)
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set include hidden files (builder pattern)
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

/// Get number of available CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Filter for ignoring files and directories
pub struct IgnoreFilter {
    /// Gitignore rules
    gitignore: Option<Gitignore>,

    /// Custom glob patterns
    custom_globs: GlobSet,

    /// Default ignore patterns
    default_ignores: GlobSet,

    /// Whether to include hidden files
    include_hidden: bool,
}

impl IgnoreFilter {
    /// Create a new ignore filter from config
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let gitignore = Self::build_gitignore(&config.root);

        let custom_globs = Self::build_globset(&config.ignore_patterns)?;

        let default_patterns = [
            "**/.git/**",
            "**/node_modules/**",
            "**/target/**",
            "**/dist/**",
            "**/build/**",
            "**/bin/**",
            "**/obj/**",
            "**/coverage/**",
            "**/vendor/**",
        ];
        let default_ignores = Self::build_globset(
            &default_patterns.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        )?;

        Ok(Self {
            gitignore,
            custom_globs,
            default_ignores,
            include_hidden: config.include_hidden,
        })
    }

    /// Build gitignore from root directory, tolerating a missing or bad file
    fn build_gitignore(root: &Path) -> Option<Gitignore> {
        let gitignore_path = root.join(".gitignore");
        if !gitignore_path.exists() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(root);
        builder.add(&gitignore_path);
        builder.build().ok()
    }

    /// Build a globset from patterns
    fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob(e.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ConfigError::InvalidGlob(e.to_string()))
    }

    /// Check if a path should be ignored
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let path_str = path.to_string_lossy();

        if !self.include_hidden {
            if let Some(name) = path.file_name() {
                if name.to_string_lossy().starts_with('.') {
                    return true;
                }
            }
        }

        if self.default_ignores.is_match(&*path_str) {
            return true;
        }

        if self.custom_globs.is_match(&*path_str) {
            return true;
        }

        if let Some(ref gi) = self.gitignore {
            if gi.matched(path, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }

    /// Check if path matches language filter
    pub fn matches_language_filter(&self, path: &Path, filter: &Option<Vec<Language>>) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };

        let ext_str = ext.to_string_lossy();
        let Some(lang) = Language::from_extension(&ext_str) else {
            return false;
        };

        match filter {
            Some(langs) => langs.contains(&lang),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::new(PathBuf::from("/test"))
            .with_threads(4)
            .with_language_filter(vec![Language::PowerShell])
            .with_max_file_size(1024);

        assert_eq!(config.threads, 4);
        assert!(config.language_filter.is_some());
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.parse_parameter_types);
        assert!(options.expand_function_details);

        let bare = ParseOptions::structure_only();
        assert!(!bare.parse_parameter_types);
        assert!(!bare.expand_function_details);
    }

    #[test]
    fn test_language_filter() {
        let config = ScanConfig::new(PathBuf::from("."));
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(filter.matches_language_filter(
            Path::new("test.ps1"),
            &Some(vec![Language::PowerShell])
        ));
        assert!(!filter.matches_language_filter(
            Path::new("test.json"),
            &Some(vec![Language::PowerShell])
        ));
        assert!(filter.matches_language_filter(Path::new("test.json"), &None));
        assert!(!filter.matches_language_filter(Path::new("test.txt"), &None));
    }

    #[test]
    fn test_should_ignore_hidden() {
        let config = ScanConfig::new(PathBuf::from("."));
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(filter.should_ignore(Path::new(".hidden.ps1"), false));
        assert!(filter.should_ignore(Path::new("a/node_modules/x.json"), false));
        assert!(!filter.should_ignore(Path::new("a/script.ps1"), false));
    }
}
