//! CLI entry point for modelgen

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use modelgen::codegen::derive_cache_keys;
use modelgen::parser::{parse_table, split_statements};
use modelgen::{GenerationReport, GeneratorConfig, NamingStyle};

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(about = "Generate cached Rust data-access models from MySQL CREATE TABLE statements")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of template overrides (overrides config)
    #[arg(long, global = true)]
    template_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate models from a DDL file
    Ddl(GenerateArgs),
    /// Generate models from a JSON file of parsed tables
    Tables(GenerateArgs),
    /// Inspect schema (show parsed tables and cache keys for debugging)
    Inspect {
        /// Path to SQL schema file (overrides config)
        #[arg(short, long)]
        src: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Source file (overrides config)
    #[arg(short, long)]
    src: Option<PathBuf>,

    /// Destination directory (overrides config)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// File naming style: gozero, go_zero, go-zero, GoZero or goZero
    #[arg(long)]
    style: Option<NamingStyle>,

    /// Generate cached models
    #[arg(long)]
    cache: bool,

    /// Package name (defaults to the destination's base name)
    #[arg(long)]
    package: Option<String>,
}

impl GenerateArgs {
    fn apply(self, config: &mut GeneratorConfig) {
        if let Some(src) = self.src {
            config.src = src;
        }
        if let Some(dir) = self.dir {
            config.dir = dir;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if self.cache {
            config.cache = true;
        }
        if let Some(package) = self.package {
            config.package = Some(package);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = GeneratorConfig::load(cli.config.as_deref())?;

    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    if let Some(dir) = cli.template_dir {
        config.template_dir = Some(dir);
    }

    let report = match cli.command {
        Commands::Ddl(args) => {
            args.apply(&mut config);
            config.validate()?;
            modelgen::generate(&config)?
        }
        Commands::Tables(args) => {
            args.apply(&mut config);
            config.validate()?;
            modelgen::generate_from_tables(&config)?
        }
        Commands::Inspect { src } => {
            if let Some(src) = src {
                config.src = src;
            }
            config.validate()?;
            return inspect_schema(&config);
        }
    };

    finish(report)
}

fn finish(report: GenerationReport) -> Result<()> {
    for failure in &report.failures {
        eprintln!("error: {}", failure);
    }
    if !report.is_success() {
        bail!("{} tables failed to generate", report.failures.len());
    }

    info!(
        "Generated {} models ({} already existed)",
        report.written.len(),
        report.skipped.len()
    );
    Ok(())
}

fn inspect_schema(config: &GeneratorConfig) -> Result<()> {
    let schema_sql = std::fs::read_to_string(&config.src)?;
    let mut statements = split_statements(&schema_sql);
    statements.reverse();

    println!("Found {} table definitions:\n", statements.len());
    for statement in statements {
        let table = match parse_table(statement) {
            Ok(table) => table,
            Err(e) => {
                println!("Error: {}\n", e);
                continue;
            }
        };

        println!("Table: {}", table.name);
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let auto_inc = if col.is_auto_increment {
                " AUTO_INCREMENT"
            } else {
                ""
            };
            println!(
                "    - {} {} {}{}",
                col.name, col.data_type, nullable, auto_inc
            );
        }
        if let Some(pk) = &table.primary_key {
            println!("  Primary Key: {}", pk.column);
        }
        for uk in &table.unique_keys {
            println!("  Unique Key: {} ({})", uk.name, uk.columns.join(", "));
        }

        match derive_cache_keys(&table) {
            Ok(keys) => {
                println!("  Cache Keys:");
                for key in keys.all() {
                    println!("    - {} {} -> {}", key.method_name, key.const_name, key.prefix);
                }
            }
            Err(e) => println!("  Cache Keys: {}", e),
        }
        println!();
    }

    Ok(())
}
