pub mod walker;

pub use walker::{scan_coverage_reports, scan_surefire_reports, scan_test_sources, FileWalker};

use std::fs;
use std::path::Path;

/// Write `content`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
