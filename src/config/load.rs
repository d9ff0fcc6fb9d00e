use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use super::types::AtlasConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: AtlasConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: AtlasConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve the assets root relative to the config file directory.
    pub fn resolve_assets_root(&self) -> PathBuf {
        self.config_dir.join(&self.config.assets_root)
    }

    /// Resolve the output directory relative to the config file directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

/// Expand icon names and glob patterns against the icon names on disk.
///
/// Plain names are kept even when no file exists, so the packer can warn
/// about them. Patterns that match nothing are reported and dropped.
/// The result has no duplicates and keeps the order of first appearance.
pub fn expand_icon_patterns(patterns: &[String], available: &[String]) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for pattern in patterns {
        if !is_glob_pattern(pattern) {
            push(pattern);
            continue;
        }

        let matcher = glob::Pattern::new(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;
        let mut matched = false;
        for name in available.iter().filter(|name| matcher.matches(name)) {
            push(name);
            matched = true;
        }
        if !matched {
            warn!("Icon pattern '{}' matched no files", pattern);
        }
    }

    Ok(names)
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}
