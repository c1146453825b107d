//! Configuration validation.

use super::types::{AppConfig, ConfigurationsConfig, OutputConfig};
use crate::matching::{MatchingOptions, TypeMatchingMode};
use std::collections::HashSet;

/// A validation failure for one configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.configurations.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for MatchingOptions {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            errors.push(ConfigError::new(
                "matching.similarity_threshold",
                format!(
                    "Threshold must be between 0.0 and 1.0, got {}",
                    self.similarity_threshold
                ),
            ));
        }
        let has_marker = self
            .capability_marker
            .as_deref()
            .is_some_and(|m| !m.trim().is_empty());
        if self.type_matching == TypeMatchingMode::Capability && !has_marker {
            errors.push(ConfigError::new(
                "matching.capability_marker",
                "Capability matching requires a capability marker",
            ));
        }
        errors
    }
}

impl Validatable for ConfigurationsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_parallelism == Some(0) {
            errors.push(ConfigError::new(
                "configurations.max_parallelism",
                "Parallelism must be at least 1",
            ));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.to_lowercase()) {
                errors.push(ConfigError::new(
                    "configurations.targets",
                    format!("Duplicate target '{target}'"),
                ));
            }
        }

        let mut custom_ids = HashSet::new();
        for (i, custom) in self.custom.iter().enumerate() {
            if custom.id.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("configurations.custom[{i}].id"),
                    "Configuration id must not be empty",
                ));
            } else if !custom_ids.insert(custom.id.to_lowercase()) {
                errors.push(ConfigError::new(
                    format!("configurations.custom[{i}].id"),
                    format!("Duplicate configuration '{}'", custom.id),
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        errors
    }
}
