use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::TestmapConfig;
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".testmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
pub fn parse_and_validate_config(contents: &str) -> Result<TestmapConfig, ConfigError> {
    parse_config_at(contents, Path::new(CONFIG_FILE_NAME))
}

fn parse_config_at(contents: &str, path: &Path) -> Result<TestmapConfig, ConfigError> {
    let config = toml::from_str::<TestmapConfig>(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_from_path(path: &Path) -> Result<TestmapConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_at(&contents, path)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// `start` and its parents, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.testmap.toml` at or above `start`.
pub fn find_config_file(start: PathBuf) -> Option<PathBuf> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Load the nearest config above `start`, or defaults when there is none.
pub fn load_config_from_dir(start: PathBuf) -> Result<TestmapConfig, ConfigError> {
    match find_config_file(start) {
        Some(path) => load_config_from_path(&path),
        None => {
            tracing::debug!(
                "No {} found after checking {} directories. Using default config.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            Ok(TestmapConfig::default())
        }
    }
}

/// Load the nearest config above the working directory.
pub fn load_config() -> Result<TestmapConfig, ConfigError> {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(dir),
        Err(e) => {
            tracing::warn!("Failed to get current directory: {}. Using default config.", e);
            Ok(TestmapConfig::default())
        }
    }
}
