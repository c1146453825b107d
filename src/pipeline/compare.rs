//! Comparison service: one old/new pair across target configurations.

use crate::config::{AppConfig, Configuration, ConfigurationRegistry};
use crate::diff::{DiffEngine, DiffResult};
use crate::error::{DeclDiffError, Result};
use crate::merge::{has_configuration_directives, ConfigurationMerger, ConfigurationRun};
use crate::model::{Change, StructuralNode};
use crate::parsers::{ParserKind, ParserRegistry};
use rayon::prelude::*;
use std::path::Path;

/// Parses, diffs and merges comparisons according to an [`AppConfig`].
///
/// The service is immutable once built and safe to share across threads.
pub struct ComparisonService {
    engine: DiffEngine,
    registry: ConfigurationRegistry,
    parsers: ParserRegistry,
    parser_kind: ParserKind,
    merger: ConfigurationMerger,
    /// Bounded pool for configuration runs; `None` uses the global pool
    pool: Option<rayon::ThreadPool>,
    quiet: bool,
}

impl ComparisonService {
    /// Build a service, rejecting invalid matching options.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            engine: DiffEngine::with_options(config.diff_options())?,
            registry: ConfigurationRegistry::from_config(&config.configurations),
            parsers: ParserRegistry::new(),
            parser_kind: config.behavior.parser,
            merger: ConfigurationMerger::new(config.matching.name_comparison),
            pool: build_pool(config.configurations.max_parallelism),
            quiet: config.behavior.quiet,
        })
    }

    /// Worker threads available to configuration runs.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads)
    }

    /// Replace the diff engine (e.g. one with a custom sibling matcher).
    #[must_use]
    pub fn with_engine(mut self, engine: DiffEngine) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    /// Resolve target ids, rejecting unknown ones before any work starts.
    ///
    /// The result is sorted by id so runs merge deterministically.
    pub fn resolve_targets(&self, targets: &[String]) -> Result<Vec<Configuration>> {
        let mut configurations = self.registry.resolve(targets)?;
        configurations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(configurations)
    }

    /// Compare two versions of one source file given as text.
    ///
    /// `None` on either side means the file did not exist in that version.
    /// An empty `targets` list performs a single unconditioned run.
    pub fn compare_sources(
        &self,
        path: &str,
        old: Option<&str>,
        new: Option<&str>,
        targets: &[String],
    ) -> Result<DiffResult> {
        let configurations = self.resolve_targets(targets)?;
        Ok(self.compare_resolved(path, old, new, &configurations))
    }

    /// Compare two files on disk.
    pub fn compare_files(&self, old: Option<&Path>, new: Option<&Path>, targets: &[String]) -> Result<DiffResult> {
        let configurations = self.resolve_targets(targets)?;
        let path = display_path(old, new)?;
        let old_text = old.map(read_source).transpose()?;
        let new_text = new.map(read_source).transpose()?;
        Ok(self.compare_resolved(&path, old_text.as_deref(), new_text.as_deref(), &configurations))
    }

    pub(crate) fn compare_resolved(
        &self,
        path: &str,
        old: Option<&str>,
        new: Option<&str>,
        configurations: &[Configuration],
    ) -> DiffResult {
        let ids: Vec<String> = configurations.iter().map(|c| c.id.clone()).collect();

        let Some(first) = configurations.first() else {
            return DiffResult::new(self.run(path, old, new, None), Vec::new()).with_path(path);
        };

        let has_directives = [old, new].into_iter().flatten().any(has_configuration_directives);
        if !has_directives {
            if !self.quiet {
                tracing::info!(path, "no conditional directives, analyzing once for all configurations");
            }
            // every configuration sees the same text, so every change is universal
            return DiffResult::new(self.run(path, old, new, Some(first)), ids).with_path(path);
        }

        if !self.quiet {
            tracing::info!(path, configurations = configurations.len(), "analyzing configurations");
        }
        let analyze = |configuration: &Configuration| {
            ConfigurationRun::new(configuration.id.clone(), self.run(path, old, new, Some(configuration)))
        };
        let runs: Vec<ConfigurationRun> = match &self.pool {
            Some(pool) => pool.install(|| configurations.par_iter().map(analyze).collect()),
            None => configurations.par_iter().map(analyze).collect(),
        };

        self.merger.merge(runs).with_path(path)
    }

    /// One configuration run. Parse failures become a synthetic change.
    fn run(&self, path: &str, old: Option<&str>, new: Option<&str>, configuration: Option<&Configuration>) -> Vec<Change> {
        let old_tree = old.map(|text| self.parse(text, path, configuration));
        let new_tree = new.map(|text| self.parse(text, path, configuration));

        match (old_tree.transpose(), new_tree.transpose()) {
            (Ok(old_tree), Ok(new_tree)) => self.engine.diff_sides(old_tree.as_ref(), new_tree.as_ref()),
            (old_result, new_result) => {
                let old_diag = old_result.err().map(|e| e.to_string());
                let new_diag = new_result.err().map(|e| e.to_string());
                tracing::warn!(
                    path,
                    configuration = configuration.map_or("default", |c| c.id.as_str()),
                    "parse failed, reporting a parse-error change"
                );
                vec![Change::parse_error(path, old_diag.as_deref(), new_diag.as_deref())]
            }
        }
    }

    fn parse(&self, text: &str, path: &str, configuration: Option<&Configuration>) -> Result<StructuralNode> {
        self.parsers
            .select(self.parser_kind, text, path)
            .parse_under(text, path, configuration)
    }
}

fn build_pool(max_parallelism: Option<usize>) -> Option<rayon::ThreadPool> {
    let threads = max_parallelism.filter(|&n| n > 0)?;
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!(threads, error = %e, "could not build a bounded thread pool, using the global pool");
            None
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| DeclDiffError::io(path, e))
}

/// Name reported for a comparison: the new path, else the old one.
fn display_path(old: Option<&Path>, new: Option<&Path>) -> Result<String> {
    new.or(old)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .ok_or_else(|| DeclDiffError::invalid_argument("paths", "at least one side must be given"))
}
