//! **Structural diff and API impact classification for declarative source code.**
//!
//! `decldiff` compares two versions of a source file as trees of declarations
//! (namespaces, types, members) rather than as lines of text. It pairs
//! declarations across versions, reports what was added, removed, modified,
//! renamed or moved, and classifies every change by how badly it can break
//! consumers of the code.
//!
//! When a file is compiled under several build configurations (target
//! frameworks, custom symbol sets), each configuration is analyzed on its own
//! and the results are merged so that every change lists the configurations
//! it applies to.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`StructuralNode`] trees and the [`Change`] records produced
//!   by comparing them.
//! - **[`matching`]**: the [`NodeMatcher`] that pairs sibling declarations by
//!   name, kind, signature and similarity.
//! - **[`diff`]**: the [`DiffEngine`], which walks two trees and builds the
//!   hierarchical change list.
//! - **[`classify`]**: the [`ImpactClassifier`] that rates each change.
//! - **[`merge`]**: the [`ConfigurationMerger`] that folds per-configuration
//!   results into one.
//! - **[`parsers`]**: turning text into trees.
//! - **[`pipeline`]**: the [`ComparisonService`] tying it all together, plus
//!   batch comparison and report output.
//! - **[`reports`]**: JSON and human-readable summary output.
//!
//! ## Comparing two trees
//!
//! ```
//! use decldiff::{DiffEngine, NodeKind, StructuralNode, Visibility};
//!
//! let old = StructuralNode::new(NodeKind::Type, Some("Widget"), "class Widget").with_children(vec![
//!     StructuralNode::new(NodeKind::Method, Some("Draw"), "public void Draw()")
//!         .with_visibility(Visibility::Public),
//! ]);
//! let new = StructuralNode::new(NodeKind::Type, Some("Widget"), "class Widget");
//!
//! let result = DiffEngine::new().diff(&old, &new);
//! assert!(result.has_public_breaking_changes());
//! ```
//!
//! ## Comparing across configurations
//!
//! ```no_run
//! use std::path::Path;
//! use decldiff::{AppConfig, ComparisonService};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::builder().target("net8.0").target("net48").build();
//!     let service = ComparisonService::from_config(&config)?;
//!     let result = service.compare_files(
//!         Some(Path::new("old/Widget.cs")),
//!         Some(Path::new("new/Widget.cs")),
//!         &config.configurations.targets,
//!     )?;
//!     for change in &result.changes {
//!         println!("{:?} {} {:?}", change.change_type, change.display_name(), change.applicable_configurations);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    // `old`/`new` pairs are everywhere
    clippy::similar_names
)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod matching;
pub mod merge;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;
pub mod utils;

// Re-export main types for convenience
pub use classify::{Classification, ClassificationInput, ImpactClassifier};
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset, Configuration, ConfigurationRegistry};
pub use config::{ConfigError, Validatable};
pub use diff::{DiffEngine, DiffOptions, DiffResult, DiffSummary, WhitespaceMode};
pub use error::{DeclDiffError, Result};
pub use matching::{MatchingOptions, NameComparison, NodeMatcher, SiblingMatcher, TypeMatchingMode};
pub use merge::{ConfigurationMerger, ConfigurationRun};
pub use model::{Change, ChangeType, Impact, NodeKind, Span, StructuralNode, Visibility};
pub use parsers::{JsonTreeParser, LineParser, ParserKind, SourceParser};
pub use pipeline::{BatchResult, ComparisonService, FilePair};
pub use reports::{ReportFormat, ReportGenerator};
