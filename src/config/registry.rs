//! Known build configurations and their preprocessor symbols.
//!
//! The registry is seeded with common .NET target framework monikers; the
//! config file can declare more. Requests for ids the registry does not know
//! are rejected before any diffing starts.

use super::types::ConfigurationsConfig;
use crate::error::{ConfigurationErrorKind, DeclDiffError, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

/// One build configuration: an id and the symbols defined under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub id: String,
    pub symbols: Vec<String>,
}

impl Configuration {
    pub fn new<I, S>(id: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `symbol` is defined. Preprocessor symbols are case-sensitive.
    #[must_use]
    pub fn defines(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

/// Modern .NET versions, oldest first.
const NET_VERSIONS: &[(u32, &str)] = &[(5, "net5.0"), (6, "net6.0"), (7, "net7.0"), (8, "net8.0"), (9, "net9.0")];

const NETSTANDARD_VERSIONS: &[&str] = &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "2.0", "2.1"];

const NETCOREAPP_VERSIONS: &[&str] = &["1.0", "1.1", "2.0", "2.1", "2.2", "3.0", "3.1"];

const NETFRAMEWORK_VERSIONS: &[&str] = &[
    "20", "35", "40", "45", "451", "452", "46", "461", "462", "47", "471", "472", "48", "481",
];

/// Registry of configurations addressable by id (case-insensitive).
#[derive(Debug, Clone)]
pub struct ConfigurationRegistry {
    entries: IndexMap<String, Configuration>,
}

impl Default for ConfigurationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ConfigurationRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// The built-in target framework monikers.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        for (i, version) in NETSTANDARD_VERSIONS.iter().enumerate() {
            let mut symbols = vec!["NETSTANDARD".to_string(), format!("NETSTANDARD{}", underscored(version))];
            symbols.extend(
                NETSTANDARD_VERSIONS[..=i]
                    .iter()
                    .map(|v| format!("NETSTANDARD{}_OR_GREATER", underscored(v))),
            );
            registry.register(Configuration::new(format!("netstandard{version}"), symbols));
        }

        for (i, version) in NETCOREAPP_VERSIONS.iter().enumerate() {
            let mut symbols = vec!["NETCOREAPP".to_string(), format!("NETCOREAPP{}", underscored(version))];
            symbols.extend(
                NETCOREAPP_VERSIONS[..=i]
                    .iter()
                    .map(|v| format!("NETCOREAPP{}_OR_GREATER", underscored(v))),
            );
            registry.register(Configuration::new(format!("netcoreapp{version}"), symbols));
        }

        for (i, version) in NETFRAMEWORK_VERSIONS.iter().enumerate() {
            let mut symbols = vec!["NETFRAMEWORK".to_string(), format!("NET{version}")];
            symbols.extend(
                NETFRAMEWORK_VERSIONS[..=i]
                    .iter()
                    .map(|v| format!("NET{v}_OR_GREATER")),
            );
            registry.register(Configuration::new(format!("net{version}"), symbols));
        }

        for (i, (major, id)) in NET_VERSIONS.iter().enumerate() {
            let mut symbols = vec!["NET".to_string(), "NETCOREAPP".to_string(), format!("NET{major}_0")];
            symbols.extend(
                NET_VERSIONS[..=i]
                    .iter()
                    .map(|(m, _)| format!("NET{m}_0_OR_GREATER")),
            );
            symbols.extend(
                NETCOREAPP_VERSIONS
                    .iter()
                    .map(|v| format!("NETCOREAPP{}_OR_GREATER", underscored(v))),
            );
            registry.register(Configuration::new(*id, symbols));
        }

        registry
    }

    /// Built-ins plus the configurations declared in `config`.
    #[must_use]
    pub fn from_config(config: &ConfigurationsConfig) -> Self {
        let mut registry = Self::builtin();
        for custom in &config.custom {
            registry.register(Configuration::new(custom.id.clone(), custom.symbols.clone()));
        }
        registry
    }

    /// Add or replace a configuration.
    pub fn register(&mut self, configuration: Configuration) {
        self.entries.insert(configuration.id.to_lowercase(), configuration);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Configuration> {
        self.entries.get(&id.to_lowercase())
    }

    /// Supported ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|c| c.id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve requested ids, failing on the first unknown or repeated one.
    pub fn resolve(&self, requested: &[String]) -> Result<Vec<Configuration>> {
        let mut seen = HashSet::new();
        requested
            .iter()
            .map(|id| {
                let configuration = self.get(id).ok_or_else(|| {
                    let supported: Vec<&str> = self.ids().collect();
                    DeclDiffError::unknown_configuration(id.clone(), &supported)
                })?;
                if !seen.insert(configuration.id.to_lowercase()) {
                    return Err(DeclDiffError::configuration(
                        "resolving target configurations",
                        ConfigurationErrorKind::Duplicate(id.clone()),
                    ));
                }
                Ok(configuration.clone())
            })
            .collect()
    }
}

/// `"2.0"` -> `"2_0"`
fn underscored(version: &str) -> String {
    version.replace('.', "_")
}
