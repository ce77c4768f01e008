//! pivmeta - PIV metadata JSON-LD CLI
//!
//! Encode records as JSON-LD, query JSON-LD documents for typed entities and
//! manage the remote document cache.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use pivmeta_core::{
    init_builtin, namespace, CodecConfig, DecodeOptions, Decoder, Encoder, Entity,
    Source,
};

#[derive(Parser)]
#[command(name = "pivmeta")]
#[command(version = pivmeta_core::VERSION)]
#[command(about = "PIV metadata object-graph mapping", long_about = None)]
struct Cli {
    /// Codec config file (YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered entity types
    Types,
    /// Show the predicate a field resolves to
    Resolve {
        /// Entity type (e.g., Person)
        type_name: String,
        /// Field name (e.g., firstName)
        field: String,
    },
    /// Print the @context the encoder writes
    Context {
        /// Reference a remote context (the configured default without a URL)
        /// instead of inlining every prefix
        #[arg(long, value_name = "URL", num_args = 0..=1, default_missing_value = "")]
        external: Option<String>,
    },
    /// Encode a plain JSON record as JSON-LD
    Encode {
        /// Entity type of the record
        type_name: String,
        /// Record as JSON text, file path or URL
        record: String,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Decode every entity of a type from a JSON-LD document
    Query {
        /// Entity type to select (e.g., Person)
        type_name: String,
        /// JSON-LD as text, file path or URL
        source: String,
        /// Fail on the first node that cannot be decoded
        #[arg(long)]
        strict: bool,
        /// Stop after this many entities
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage the remote document cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// List cached documents
    List,
    /// Remove every cached document
    Clear,
    /// Download a document into the cache
    Fetch {
        url: String,
        /// Download even when a cached copy exists
        #[arg(long)]
        force: bool,
        /// Expected SHA-256 of the document (hex)
        #[arg(long)]
        sha256: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")?;

    let config = match &cli.config {
        Some(path) => CodecConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CodecConfig::default(),
    };

    init_builtin()?;

    match cli.command {
        Commands::Types => handle_types(),
        Commands::Resolve { type_name, field } => handle_resolve(&type_name, &field),
        Commands::Context { external } => handle_context(&config, external),
        Commands::Encode { type_name, record, output } => {
            handle_encode(&config, &type_name, &record, output)
        }
        Commands::Query { type_name, source, strict, limit } => {
            handle_query(&config, &type_name, &source, strict, limit)
        }
        Commands::Cache { command } => handle_cache(&config, command),
    }
}

fn handle_types() -> Result<()> {
    let registry = namespace::global();
    let mut names: Vec<&str> = registry.type_names().collect();
    names.sort_unstable();

    println!("\n{:<28} {:<24} {:<60}", "TYPE", "PARENT", "IRI");
    println!("{}", "-".repeat(112));
    for name in &names {
        let parents = registry
            .schema(name)
            .map(|s| s.parents.join(","))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "-".to_string());
        let iri = registry.instance_type_iri(name);
        println!("{:<28} {:<24} {:<60}", name, parents, iri);
    }
    println!("\nTotal: {} type(s)", names.len());
    Ok(())
}

fn handle_resolve(type_name: &str, field: &str) -> Result<()> {
    let registry = namespace::global();
    if !registry.contains_type(type_name) {
        return Err(anyhow!("unknown type '{}' (see `pivmeta types`)", type_name));
    }
    let predicate = registry.resolve(type_name, field);
    println!("{}", predicate);
    println!("{}", registry.expand(&predicate)?);
    Ok(())
}

fn handle_context(config: &CodecConfig, external: Option<String>) -> Result<()> {
    let registry = namespace::global();
    let config = match external {
        Some(url) => CodecConfig {
            inline_context: false,
            default_context: Some(url).filter(|u| !u.is_empty()).or_else(|| config.default_context.clone()),
            ..config.clone()
        },
        None => config.clone(),
    };
    let options = config.encode_options();
    let document = Encoder::with_options(&registry, options).encode(&[])?;
    println!("{}", serde_json::to_string_pretty(&document["@context"])?);
    Ok(())
}

fn handle_encode(
    config: &CodecConfig,
    type_name: &str,
    record: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let loader = config.loader()?;
    let registry = namespace::global();

    let json = Source::detect(record).load(&loader)?;
    let records = match json {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    let entities = records
        .iter()
        .map(|r| Entity::from_record(&registry, type_name, r))
        .collect::<pivmeta_core::errors::Result<Vec<_>>>()?;

    let encoder = Encoder::with_options(&registry, config.encode_options());
    match output {
        Some(path) => {
            encoder.encode_to_file(&entities, &path)?;
            eprintln!("✓ Wrote {} entit(ies) to {}", entities.len(), path.display());
        }
        None => println!("{}", encoder.encode_to_string(&entities)?),
    }
    Ok(())
}

fn handle_query(
    config: &CodecConfig,
    type_name: &str,
    source: &str,
    strict: bool,
    limit: Option<usize>,
) -> Result<()> {
    let loader = config.loader()?;
    let registry = namespace::global();

    let options = DecodeOptions {
        strict: strict || config.strict,
        limit,
        ..config.decode_options()
    };
    let outcome = Decoder::new(&registry, &loader)
        .with_options(options)
        .decode_outcome(&Source::detect(source), type_name)?;

    for skipped in &outcome.errors {
        eprintln!("Skipped {}: {}", skipped.subject, skipped.error);
    }
    let records: Vec<_> = outcome.entities.iter().map(Entity::to_record).collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn handle_cache(config: &CodecConfig, command: CacheCommands) -> Result<()> {
    let loader = config.loader()?;
    match command {
        CacheCommands::List => {
            let entries = loader.list()?;
            if entries.is_empty() {
                println!("No cached documents in {}", loader.cache_dir().display());
                return Ok(());
            }
            println!("\n{:<60} {:>10} {:<25}", "FILE", "BYTES", "MODIFIED");
            println!("{}", "-".repeat(97));
            for entry in &entries {
                let modified = entry
                    .modified
                    .map(|m| m.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<60} {:>10} {:<25}", entry.file_name, entry.size_bytes, modified);
            }
            println!("\nTotal: {} document(s)", entries.len());
        }
        CacheCommands::Clear => {
            let removed = loader.clear()?;
            println!("✓ Removed {} cached document(s)", removed);
        }
        CacheCommands::Fetch { url, force, sha256 } => {
            let loader = loader.with_force_download(force || config.force_download);
            let path = loader.fetch_verified(&url, sha256.as_deref())?;
            println!("✓ {}", path.display());
        }
    }
    Ok(())
}
