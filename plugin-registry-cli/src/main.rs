//! # plugin-registry
//!
//! Command line driver for the plugin registry loader.
//!
//! ## Running
//!
//! ```bash
//! # List every plugin from the hosted registry
//! cargo run --bin plugin-registry -- list
//!
//! # Search a local checkout
//! cargo run --bin plugin-registry -- --dev --root ../marketplace list --search langgraph
//!
//! # Validate the manifest, with debug logging
//! RUST_LOG=debug cargo run --bin plugin-registry -- validate
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plugin_registry_cli::config::{Config, OutputFormat};
use plugin_registry_cli::output;
use plugin_registry_core::{validate_document, EnrichedPluginEntry, Enricher};
use plugin_registry_loader::{RegistryLoader, SourceMode};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Load, search, and validate plugin registries.
#[derive(Parser, Debug)]
#[command(name = "plugin-registry", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read from a local marketplace checkout instead of the hosted registry
    #[arg(long, global = true)]
    dev: bool,

    /// Root of the local checkout (implies --dev)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List plugins, optionally filtered.
    List {
        /// Case-insensitive search over tags, keywords, name, description and category
        #[arg(long)]
        search: Option<String>,
        /// Only plugins in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one plugin and its README.
    Show {
        /// Plugin name
        name: String,
    },
    /// Validate the registry manifest.
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, fallback_reason) = match &cli.config {
        Some(path) => (Config::load(path)?, None),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    init_logging(&config.cli.log_level);

    if let Some(e) = fallback_reason {
        warn!("Failed to load config, using defaults: {:#}", e);
    }

    let mut source = config.source.clone();
    if cli.dev || cli.root.is_some() {
        source.mode = SourceMode::Development;
    }
    if let Some(root) = &cli.root {
        source.local.root = root.clone();
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.cli.output
    };

    info!("Using {:?} registry source", source.mode);
    let loader = RegistryLoader::with_enricher(source, Enricher::new(config.palette()));

    match cli.command {
        Commands::List { search, category } => list(&loader, search, category, format).await,
        Commands::Show { name } => show(&loader, &name, format).await,
        Commands::Validate => validate(&loader, format).await,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn list(
    loader: &RegistryLoader,
    search: Option<String>,
    category: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let registry = loader
        .load_registry()
        .await
        .context("Failed to load plugin registry")?;

    let plugins: Vec<&EnrichedPluginEntry> = registry
        .plugins()
        .iter()
        .filter(|p| search.as_deref().map_or(true, |q| p.matches(q)))
        .filter(|p| category.as_deref().map_or(true, |c| p.in_category(c)))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plugins)?),
        OutputFormat::Text => {
            for plugin in &plugins {
                println!("{}", output::plugin_line(plugin));
            }
            println!("{} of {} plugins", plugins.len(), registry.len());
        }
    }

    Ok(())
}

async fn show(loader: &RegistryLoader, name: &str, format: OutputFormat) -> Result<()> {
    let registry = loader
        .load_registry()
        .await
        .context("Failed to load plugin registry")?;

    let plugin = registry
        .find(name)
        .with_context(|| format!("No plugin named {name:?} in the registry"))?;

    let document = loader.load_plugin_document(name).await;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "plugin": plugin,
                "readme": document,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print!("{}", output::plugin_detail(plugin, document.as_deref())),
    }

    Ok(())
}

async fn validate(loader: &RegistryLoader, format: OutputFormat) -> Result<()> {
    let document = loader
        .load_raw_registry()
        .await
        .context("Failed to load plugin registry")?;

    let report = validate_document(&document);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", output::validation_report(&report)),
    }

    if !report.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}
