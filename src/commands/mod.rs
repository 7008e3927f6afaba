pub mod init;
pub mod modules;
pub mod run;

use crate::config::{load_config, load_config_from_path, TestmapConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// An explicit `--config` file, or the nearest `.testmap.toml`.
pub(crate) fn resolve_config(explicit: Option<&Path>) -> Result<TestmapConfig> {
    match explicit {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => load_config().context("Failed to load configuration"),
    }
}
