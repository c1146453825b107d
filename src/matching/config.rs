//! Node matching configuration.

use crate::error::{DeclDiffError, Result};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default minimum similarity for type matching by normalized text.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// How node names are compared.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum NameComparison {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl NameComparison {
    /// Key used for grouping names under this policy.
    #[must_use]
    pub fn key(&self, name: &str) -> String {
        match self {
            Self::CaseSensitive => name.to_string(),
            Self::CaseInsensitive => name.to_lowercase(),
        }
    }

    #[must_use]
    pub fn names_equal(&self, a: &str, b: &str) -> bool {
        match self {
            Self::CaseSensitive => a == b,
            Self::CaseInsensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// Fallback strategy for pairing type declarations whose names differ.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum TypeMatchingMode {
    /// Only identical names pair up
    ExactName,
    /// Both declarations carry the configured marker base or interface
    Capability,
    /// Normalized text similarity meets the threshold
    Similarity,
    /// Capability when a marker is configured, then similarity
    #[default]
    Auto,
}

/// Options for the sibling matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingOptions {
    /// Name comparison policy
    pub name_comparison: NameComparison,
    /// Alternate matching mode for renamed type declarations
    pub type_matching: TypeMatchingMode,
    /// Base type or interface that marks interchangeable declarations
    pub capability_marker: Option<String>,
    /// Minimum normalized-text similarity (0.0 - 1.0)
    pub similarity_threshold: f64,
    /// Pair named members whose text is identical apart from the name
    pub detect_renames: bool,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            name_comparison: NameComparison::default(),
            type_matching: TypeMatchingMode::default(),
            capability_marker: None,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            detect_renames: true,
        }
    }
}

impl MatchingOptions {
    /// Strict preset: exact, case-sensitive names only.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            type_matching: TypeMatchingMode::ExactName,
            detect_renames: false,
            ..Self::default()
        }
    }

    /// Lenient preset: case-insensitive names and a lower similarity bar.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            name_comparison: NameComparison::CaseInsensitive,
            similarity_threshold: 0.6,
            ..Self::default()
        }
    }

    /// Reject options that violate the matcher's input contract.
    pub fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DeclDiffError::invalid_argument(
                "similarity_threshold",
                format!("must be within 0.0..=1.0, got {}", self.similarity_threshold),
            ));
        }
        if matches!(self.type_matching, TypeMatchingMode::Capability)
            && self.capability_marker.as_deref().map_or(true, str::is_empty)
        {
            return Err(DeclDiffError::invalid_argument(
                "capability_marker",
                "capability matching requires a marker type name",
            ));
        }
        Ok(())
    }
}
