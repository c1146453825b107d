//! Named configuration presets.

use super::types::{AppConfig, BehaviorConfig, ComparisonConfig, OutputConfig};
use crate::diff::WhitespaceMode;
use crate::matching::MatchingOptions;
use crate::model::Impact;
use crate::reports::ReportFormat;

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Exact whitespace, cascade matching with rename detection
    Default,
    /// Exact names only; renames show up as remove + add
    Strict,
    /// Compact JSON, quiet, breaking changes only
    Ci,
    /// Case-insensitive names, language-aware whitespace, lower similarity bar
    Lenient,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Ci => "ci",
            Self::Lenient => "lenient",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "ci" | "ci-cd" | "pipeline" => Some(Self::Ci),
            "lenient" | "permissive" | "loose" => Some(Self::Lenient),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Exact whitespace comparison with full matching cascade",
            Self::Strict => "Exact-name matching only, no rename or similarity pairing",
            Self::Ci => "Compact JSON limited to breaking changes for CI gates",
            Self::Lenient => "Case-insensitive names and language-aware whitespace",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Ci, Self::Lenient]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Ci => Self::ci_preset(),
            ConfigPreset::Lenient => Self::lenient_preset(),
        }
    }

    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            matching: MatchingOptions::strict(),
            ..Self::default()
        }
    }

    /// CI gate preset.
    ///
    /// - compact JSON for machine parsing
    /// - only breaking changes reported
    /// - quiet logging
    #[must_use]
    pub fn ci_preset() -> Self {
        Self {
            output: OutputConfig {
                format: ReportFormat::Json,
                file: None,
                min_impact: Impact::BreakingInternalApi,
                compact: true,
                no_color: true,
            },
            behavior: BehaviorConfig {
                quiet: true,
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn lenient_preset() -> Self {
        Self {
            comparison: ComparisonConfig {
                whitespace_mode: WhitespaceMode::LanguageAware,
                ..ComparisonConfig::default()
            },
            matching: MatchingOptions::lenient(),
            ..Self::default()
        }
    }
}
