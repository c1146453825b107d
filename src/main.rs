//! decldiff: structural diff and API impact classification
//!
//! Compares two versions of a source file as declaration trees, under one or
//! more build configurations, and reports what changed and whether it breaks
//! consumers.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use decldiff::{
    cli,
    config::{
        file::{discover_config_file, generate_example_config, load_or_default, CONFIG_FILE_NAMES},
        AppConfig, ConfigPreset, CustomConfiguration, Validatable,
    },
    diff::WhitespaceMode,
    matching::{NameComparison, TypeMatchingMode},
    model::Impact,
    parsers::ParserKind,
    pipeline::{exit_codes, FilePair},
    reports::ReportFormat,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "decldiff")]
#[command(version)]
#[command(about = "Structural diff and API impact classification", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No change at or above --min-impact
    1  Changes detected
    2  At least one change breaks the public API
    3  Error occurred

EXAMPLES:
    # Compare two versions of a file
    decldiff diff old/Widget.cs new/Widget.cs

    # Analyze several target frameworks and merge the results
    decldiff diff old/Widget.cs new/Widget.cs -t net8.0 -t netstandard2.0

    # CI gate: only breaking changes, compact JSON
    decldiff diff old.json new.json --preset ci

    # Compare a whole change set (an empty side means added or deleted)
    decldiff batch --pair old/A.cs=new/A.cs --pair =new/B.cs -o summary")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "DECLDIFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Comparison and output options shared by `diff` and `batch`.
#[derive(clap::Args)]
struct ComparisonArgs {
    /// Start from a named preset (default, strict, ci, lenient)
    #[arg(long, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    /// Target configuration to analyze; repeat or comma-separate for several
    #[arg(short, long = "target", value_name = "ID", value_delimiter = ',')]
    targets: Vec<String>,

    /// Declare a custom configuration as ID=SYMBOL[,SYMBOL...]
    #[arg(long = "define", value_name = "ID=SYMBOLS", value_parser = parse_custom_configuration)]
    custom: Vec<CustomConfiguration>,

    /// Maximum number of configurations analyzed concurrently
    #[arg(long, value_name = "N")]
    max_parallelism: Option<usize>,

    /// How whitespace differences are treated
    #[arg(long, default_value = "exact")]
    whitespace: WhitespaceMode,

    /// Name equality used when pairing declarations and merging configurations
    #[arg(long, default_value = "case-sensitive")]
    name_comparison: NameComparison,

    /// How type declarations are paired when their names differ
    #[arg(long, default_value = "auto")]
    type_matching: TypeMatchingMode,

    /// Base type marking a capability for capability-based matching
    #[arg(long, value_name = "TYPE")]
    capability_marker: Option<String>,

    /// Minimum similarity for pairing renamed declarations (0.0-1.0)
    #[arg(long, value_name = "SCORE")]
    threshold: Option<f64>,

    /// Include unchanged declarations in the output
    #[arg(long)]
    include_unchanged: bool,

    /// Report moved declarations as removed + added
    #[arg(long)]
    no_moves: bool,

    /// Input parser
    #[arg(long, default_value = "auto")]
    parser: ParserKind,

    /// Output format
    #[arg(short, long, default_value = "json")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Only report changes at or above this impact
    #[arg(long, default_value = "formatting-only")]
    min_impact: Impact,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

impl ComparisonArgs {
    /// CLI values as an override layer; defaults leave file settings alone.
    fn overrides(&self, quiet: bool, no_color: bool) -> AppConfig {
        let mut builder = AppConfig::builder()
            .whitespace_mode(self.whitespace)
            .name_comparison(self.name_comparison)
            .type_matching(self.type_matching)
            .include_unchanged(self.include_unchanged)
            .detect_moves(!self.no_moves)
            .max_parallelism(self.max_parallelism)
            .parser(self.parser)
            .output_format(self.output)
            .output_file(self.output_file.clone())
            .min_impact(self.min_impact)
            .compact(self.compact)
            .no_color(no_color)
            .quiet(quiet);
        if let Some(marker) = &self.capability_marker {
            builder = builder.capability_marker(marker.clone());
        }
        if let Some(threshold) = self.threshold {
            builder = builder.similarity_threshold(threshold);
        }
        for target in &self.targets {
            builder = builder.target(target.clone());
        }
        for custom in &self.custom {
            builder = builder.custom_configuration(custom.id.clone(), custom.symbols.clone());
        }
        builder.build()
    }
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the old version
    old: PathBuf,

    /// Path to the new version
    new: PathBuf,

    #[command(flatten)]
    comparison: ComparisonArgs,
}

/// Arguments for the `batch` subcommand
#[derive(Parser)]
struct BatchArgs {
    /// File pair as OLD=NEW; leave a side empty for an added or deleted file
    #[arg(long = "pair", value_name = "OLD=NEW", required = true, value_parser = FilePair::parse)]
    pairs: Vec<FilePair>,

    #[command(flatten)]
    comparison: ComparisonArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a file
    Diff(DiffArgs),

    /// Compare many file pairs in one run
    Batch(BatchArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults merged with the config file)
    Show,
    /// Print config file search paths and the discovered config file
    Path,
    /// Write an example .decldiff.yaml in the current directory
    Init,
}

fn parse_preset(name: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
    })
}

fn parse_custom_configuration(spec: &str) -> Result<CustomConfiguration, String> {
    let (id, symbols) = spec.split_once('=').unwrap_or((spec, ""));
    if id.trim().is_empty() {
        return Err(format!("expected ID=SYMBOLS, got '{spec}'"));
    }
    Ok(CustomConfiguration {
        id: id.trim().to_string(),
        symbols: symbols
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// Layer preset, config file and CLI overrides, then validate.
fn effective_config(config_path: Option<&Path>, args: &ComparisonArgs, quiet: bool, no_color: bool) -> Result<AppConfig> {
    let (file_config, loaded_from) = load_or_default(config_path);
    let mut config = args.preset.map_or_else(AppConfig::default, AppConfig::from_preset);
    config.merge(&file_config);
    config.merge(&args.overrides(quiet, no_color));

    if let Some(path) = loaded_from {
        tracing::debug!("using config file {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", details.join("\n  "));
    }
    Ok(config)
}

fn exit_with(result: Result<i32>) -> Result<()> {
    match result {
        Ok(exit_code) => {
            if exit_code != exit_codes::SUCCESS {
                std::process::exit(exit_code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Diff(args) => exit_with(
            effective_config(cli.config.as_deref(), &args.comparison, cli.quiet, cli.no_color)
                .and_then(|config| cli::run_diff(&config, Some(&args.old), Some(&args.new))),
        ),

        Commands::Batch(args) => exit_with(
            effective_config(cli.config.as_deref(), &args.comparison, cli.quiet, cli.no_color)
                .and_then(|config| cli::run_batch(&config, &args.pairs)),
        ),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "decldiff", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = decldiff::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = load_or_default(cli.config.as_deref());
                match &loaded_from {
                    Some(path) => eprintln!("# Loaded from: {}", path.display()),
                    None => eprintln!("# No config file found; showing defaults"),
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths = [
                    std::env::current_dir().ok().map(|p| p.display().to_string()),
                    Some("<git repository root>".to_string()),
                    ::dirs::config_dir().map(|p| p.join("decldiff").display().to_string()),
                    ::dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".decldiff.yaml");
                if target.exists() {
                    anyhow::bail!("{} already exists. Remove it first to re-initialize.", target.display());
                }
                std::fs::write(&target, generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
