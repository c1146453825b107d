//! Configuration file loading and discovery.

use super::types::{AppConfig, ComparisonConfig, OutputConfig};
use crate::matching::MatchingOptions;
use crate::parsers::ParserKind;
use std::path::{Path, PathBuf};

/// Recognized config file names, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".decldiff.yaml",
    ".decldiff.yml",
    "decldiff.yaml",
    "decldiff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (`~/.config/decldiff/`)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    let candidates = [
        cwd.clone(),
        cwd.as_deref().and_then(find_git_root),
        dirs::config_dir().map(|dir| dir.join("decldiff")),
        dirs::home_dir(),
    ];

    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Walk up from `start` to the first directory holding `.git`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    NotFound(PathBuf),
    Io(std::io::Error),
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Load config from the discovered file, or fall back to defaults.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so CLI arguments
    /// the user did not pass leave file settings alone.
    pub fn merge(&mut self, other: &Self) {
        let comparison = ComparisonConfig::default();
        if other.comparison.whitespace_mode != comparison.whitespace_mode {
            self.comparison.whitespace_mode = other.comparison.whitespace_mode;
        }
        if other.comparison.include_unchanged {
            self.comparison.include_unchanged = true;
        }
        if !other.comparison.detect_moves {
            self.comparison.detect_moves = false;
        }

        let matching = MatchingOptions::default();
        if other.matching.name_comparison != matching.name_comparison {
            self.matching.name_comparison = other.matching.name_comparison;
        }
        if other.matching.type_matching != matching.type_matching {
            self.matching.type_matching = other.matching.type_matching;
        }
        if other.matching.capability_marker.is_some() {
            self.matching
                .capability_marker
                .clone_from(&other.matching.capability_marker);
        }
        if (other.matching.similarity_threshold - matching.similarity_threshold).abs() > f64::EPSILON {
            self.matching.similarity_threshold = other.matching.similarity_threshold;
        }
        if !other.matching.detect_renames {
            self.matching.detect_renames = false;
        }

        if !other.configurations.targets.is_empty() {
            self.configurations
                .targets
                .clone_from(&other.configurations.targets);
        }
        // custom declarations accumulate; later ones shadow earlier ids
        for custom in &other.configurations.custom {
            self.configurations.custom.retain(|c| c.id != custom.id);
            self.configurations.custom.push(custom.clone());
        }
        if other.configurations.max_parallelism.is_some() {
            self.configurations.max_parallelism = other.configurations.max_parallelism;
        }

        let output = OutputConfig::default();
        if other.output.format != output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.min_impact != output.min_impact {
            self.output.min_impact = other.output.min_impact;
        }
        if other.output.compact {
            self.output.compact = true;
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.parser != ParserKind::default() {
            self.behavior.parser = other.behavior.parser;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(config_path: Option<&Path>, cli_overrides: &Self) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

/// Generate example config file content from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# decldiff configuration
# Place this file at .decldiff.yaml in your project root or ~/.config/decldiff/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}
