//! Schema Compatibility CLI
//!
//! Checks whether data written with one AVRO schema can be read with another.
//!
//! Usage:
//!   schema-compat check --reader new.avsc --writer old.avsc
//!   schema-compat evolve --new v2.avsc --old v1.avsc --mode full
//!   schema-compat config --init schema-compat.toml
//!
//! Exit codes: 0 compatible, 1 incompatible, 2 error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_compat::report::{self, ReportOptions};
use schema_compat::{
    check_compatibility, check_reader_writer_compatibility, CompatConfig, CompatibilityMode,
    OutputFormat, SchemaDocument,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-compat")]
#[command(about = "Check reader/writer compatibility of AVRO schemas")]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that data written with WRITER decodes with READER
    Check {
        /// Reader schema (.avsc)
        #[arg(short, long)]
        reader: PathBuf,
        /// Writer schema (.avsc)
        #[arg(short, long)]
        writer: PathBuf,
        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// Show a diff of writer vs reader on failure
        #[arg(long)]
        diff: bool,
    },

    /// Validate a schema change under a compatibility mode
    Evolve {
        /// New schema version (.avsc)
        #[arg(short, long)]
        new: PathBuf,
        /// Previous schema version (.avsc)
        #[arg(short, long)]
        old: PathBuf,
        /// backward, forward, full or none (default from config)
        #[arg(short, long)]
        mode: Option<CompatibilityMode>,
        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// Show a diff of writer vs reader on failure
        #[arg(long)]
        diff: bool,
    },

    /// Print the effective configuration, or write the defaults to a file
    Config {
        /// Write default configuration to this path
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CompatConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn load(path: &Path) -> anyhow::Result<SchemaDocument> {
    SchemaDocument::from_path(path).with_context(|| format!("loading schema {}", path.display()))
}

fn options(config: &CompatConfig, diff: bool) -> ReportOptions {
    ReportOptions {
        show_diff: diff || config.output.show_diff,
        include_schemas: config.output.include_schemas,
    }
}

/// Returns whether everything checked was compatible
fn run(cli: Cli, config: CompatConfig) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Check {
            reader,
            writer,
            format,
            diff,
        } => {
            let reader_doc = load(&reader)?;
            let writer_doc = load(&writer)?;
            let pair = check_reader_writer_compatibility(reader_doc.schema(), writer_doc.schema())?;

            let options = options(&config, diff);
            match format.unwrap_or(config.output.format) {
                OutputFormat::Json => {
                    let value = report::render_json(&pair, options);
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                OutputFormat::Text => {
                    println!("🔍 {} <- {}", reader.display(), writer.display());
                    print!("{}", report::render_text(&pair, options));
                }
            }
            Ok(pair.is_compatible())
        }

        Commands::Evolve {
            new,
            old,
            mode,
            format,
            diff,
        } => {
            let new_doc = load(&new)?;
            let old_doc = load(&old)?;
            let mode = mode.unwrap_or(config.check.mode);
            let evolution = check_compatibility(mode, new_doc.schema(), old_doc.schema())?;

            let options = options(&config, diff);
            match format.unwrap_or(config.output.format) {
                OutputFormat::Json => {
                    let value = report::render_evolution_json(&evolution, options);
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                OutputFormat::Text => {
                    println!("🔍 {} -> {}", old.display(), new.display());
                    print!("{}", report::render_evolution_text(&evolution, options));
                }
            }
            Ok(evolution.is_compatible())
        }

        Commands::Config { init } => {
            if let Some(path) = init {
                CompatConfig::default().save(&path)?;
                println!("✅ Default configuration written to {}", path.display());
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(true)
        }
    }
}
