use crate::config::{CoverageConfig, ScanConfig};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Recursive file finder with directory exclusions and a file filter.
pub struct FileWalker {
    root: PathBuf,
    excluded_dirs: Vec<String>,
    extensions: Vec<String>,
    name_patterns: Vec<Pattern>,
    max_file_size: Option<u64>,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_dirs: Vec::new(),
            extensions: Vec::new(),
            name_patterns: Vec::new(),
            max_file_size: None,
        }
    }

    pub fn with_excluded_dirs(mut self, dirs: Vec<String>) -> Self {
        self.excluded_dirs = dirs;
        self
    }

    /// Only keep files with one of these extensions (case-insensitive).
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
        self
    }

    /// Only keep files whose name matches one of these globs. Invalid globs
    /// are dropped with a warning.
    pub fn with_name_patterns(mut self, patterns: &[String]) -> Self {
        self.name_patterns = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid file pattern `{}`: {}", p, e);
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Matching files, sorted by path. A missing root yields nothing.
    pub fn walk(&self) -> Vec<PathBuf> {
        if !self.root.is_dir() {
            tracing::warn!("Directory does not exist or is not a directory: {}", self.root.display());
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.should_process(entry))
            .map(DirEntry::into_path)
            .collect();

        files.sort();
        files
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .excluded_dirs
                .iter()
                .any(|d| entry.file_name().to_string_lossy() == d.as_str())
    }

    fn should_process(&self, entry: &DirEntry) -> bool {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();

        if !self.extensions.is_empty() {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default();
            if !self.extensions.contains(&ext) {
                return false;
            }
        }

        if !self.name_patterns.is_empty()
            && !self
                .name_patterns
                .iter()
                .any(|p| p.matches_with(&name, CASE_INSENSITIVE))
        {
            return false;
        }

        if let Some(limit) = self.max_file_size {
            match entry.metadata() {
                Ok(meta) if meta.len() > limit => {
                    tracing::warn!(
                        "Skipping {} ({} bytes exceeds limit of {})",
                        path.display(),
                        meta.len(),
                        limit
                    );
                    return false;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Cannot stat {}: {}", path.display(), e);
                    return false;
                }
            }
        }

        true
    }
}

/// Java test sources under `dir`.
pub fn scan_test_sources(dir: &Path, scan: &ScanConfig) -> Vec<PathBuf> {
    FileWalker::new(dir)
        .with_excluded_dirs(scan.excluded_dirs.clone())
        .with_extensions(&["java"])
        .with_max_file_size(scan.max_source_bytes)
        .walk()
}

/// Coverage reports under `dir`. `target` is searched, since reports live there.
pub fn scan_coverage_reports(dir: &Path, coverage: &CoverageConfig, scan: &ScanConfig) -> Vec<PathBuf> {
    FileWalker::new(dir)
        .with_excluded_dirs(scan.coverage_excluded_dirs())
        .with_name_patterns(&coverage.report_patterns)
        .walk()
}

/// Surefire `TEST-*.xml` reports under `dir`. `target` is searched.
pub fn scan_surefire_reports(dir: &Path, scan: &ScanConfig) -> Vec<PathBuf> {
    FileWalker::new(dir)
        .with_excluded_dirs(scan.coverage_excluded_dirs())
        .with_extensions(&["xml"])
        .with_name_patterns(&scan.execution_patterns)
        .walk()
}
