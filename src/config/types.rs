//! Configuration types for decldiff.

use crate::diff::{DiffOptions, WhitespaceMode};
use crate::matching::{MatchingOptions, NameComparison, TypeMatchingMode};
use crate::model::Impact;
use crate::parsers::ParserKind;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a config file and overridden by CLI
/// arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Tree comparison settings
    pub comparison: ComparisonConfig,
    /// Sibling matching settings
    pub matching: MatchingOptions,
    /// Build configurations to analyze
    pub configurations: ConfigurationsConfig,
    /// Report settings
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Engine options derived from the comparison and matching sections.
    #[must_use]
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            whitespace_mode: self.comparison.whitespace_mode,
            include_unchanged: self.comparison.include_unchanged,
            detect_moves: self.comparison.detect_moves,
            matching: self.matching.clone(),
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn whitespace_mode(mut self, mode: WhitespaceMode) -> Self {
        self.config.comparison.whitespace_mode = mode;
        self
    }

    /// Emit unchanged nodes.
    pub const fn include_unchanged(mut self, include: bool) -> Self {
        self.config.comparison.include_unchanged = include;
        self
    }

    pub const fn detect_moves(mut self, detect: bool) -> Self {
        self.config.comparison.detect_moves = detect;
        self
    }

    pub const fn name_comparison(mut self, comparison: NameComparison) -> Self {
        self.config.matching.name_comparison = comparison;
        self
    }

    pub const fn type_matching(mut self, mode: TypeMatchingMode) -> Self {
        self.config.matching.type_matching = mode;
        self
    }

    /// Set the marker base type used by capability matching.
    pub fn capability_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.matching.capability_marker = Some(marker.into());
        self
    }

    pub const fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.matching.similarity_threshold = threshold;
        self
    }

    /// Add a target configuration id.
    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.config.configurations.targets.push(id.into());
        self
    }

    /// Declare a custom configuration with its preprocessor symbols.
    pub fn custom_configuration<I, S>(mut self, id: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.configurations.custom.push(CustomConfiguration {
            id: id.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub const fn max_parallelism(mut self, threads: Option<usize>) -> Self {
        self.config.configurations.max_parallelism = threads;
        self
    }

    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Only report changes at or above this impact.
    pub const fn min_impact(mut self, impact: Impact) -> Self {
        self.config.output.min_impact = impact;
        self
    }

    pub const fn compact(mut self, compact: bool) -> Self {
        self.config.output.compact = compact;
        self
    }

    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    pub const fn parser(mut self, parser: ParserKind) -> Self {
        self.config.behavior.parser = parser;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// How trees are compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComparisonConfig {
    /// How whitespace differences affect equality
    pub whitespace_mode: WhitespaceMode,
    /// Emit Unchanged entries
    pub include_unchanged: bool,
    /// Detect reordered and relocated declarations
    pub detect_moves: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            whitespace_mode: WhitespaceMode::default(),
            include_unchanged: false,
            detect_moves: true,
        }
    }
}

/// Build configurations to analyze.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfigurationsConfig {
    /// Configuration ids to analyze; empty means one default run
    pub targets: Vec<String>,
    /// User-declared configurations in addition to the built-in ones
    pub custom: Vec<CustomConfiguration>,
    /// Upper bound on concurrent configuration runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallelism: Option<usize>,
}

/// A user-declared build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomConfiguration {
    pub id: String,
    /// Preprocessor symbols defined under this configuration
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    /// Write the report here instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Minimum impact a change (or one of its descendants) needs to be reported
    pub min_impact: Impact,
    /// Single-line JSON
    pub compact: bool,
    /// Never color terminal output
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Json,
            file: None,
            min_impact: Impact::FormattingOnly,
            compact: false,
            no_color: false,
        }
    }
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress progress logging
    pub quiet: bool,
    /// How input files are turned into trees
    pub parser: ParserKind,
}
