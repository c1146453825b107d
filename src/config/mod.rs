//! Configuration for decldiff.
//!
//! - Type-safe configuration sections with validation
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//! - The registry of known build configurations
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use decldiff::config::{AppConfig, ConfigPreset};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Ci);
//!
//! let config = AppConfig::builder()
//!     .whitespace_mode(WhitespaceMode::LanguageAware)
//!     .target("net8.0")
//!     .target("netstandard2.0")
//!     .build();
//!
//! use decldiff::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.decldiff.yaml` file in your project root or `~/.config/decldiff/`:
//!
//! ```yaml
//! comparison:
//!   whitespace_mode: language-aware
//! configurations:
//!   targets: [net8.0, netstandard2.0]
//!   custom:
//!     - id: unity
//!       symbols: [UNITY_2022_3]
//! ```

mod defaults;
pub mod file;
mod registry;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use registry::{Configuration, ConfigurationRegistry};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, ComparisonConfig, ConfigurationsConfig, CustomConfiguration,
    OutputConfig,
};
pub use validation::{ConfigError, Validatable};

/// JSON Schema for the config file format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
