use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use fieldcheck_catalog::{CliConfig, OutputFormat, SchemaCatalog};
use fieldcheck_core::{Error as SchemaError, Schema, Violation};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Text => Self::Text,
            CliOutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "fieldcheck")]
#[command(about = "Validate JSON documents against declarative schemas")]
struct Cli {
    /// Path to a fieldcheck YAML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate JSON documents against a schema.
    Validate(ValidateArgs),
    /// Compile schema documents and report every error.
    Check(CheckArgs),
    /// Print the canonical form of a schema document.
    Normalize(NormalizeArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema document to validate against.
    #[arg(long, conflicts_with_all = ["catalog_dir", "name"])]
    schema: Option<PathBuf>,
    /// Directory of schema documents (defaults to the configured catalog).
    #[arg(long, requires = "name")]
    catalog_dir: Option<PathBuf>,
    /// Name of the catalog schema to validate against.
    #[arg(long)]
    name: Option<String>,
    /// JSON files to validate; `-` reads standard input.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Treat every non-empty line of an input as its own document.
    #[arg(long)]
    ndjson: bool,
    /// Number of documents validated in parallel.
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long)]
    format: Option<CliOutputFormat>,
    /// Violations printed per document (0 prints all).
    #[arg(long)]
    max_violations: Option<usize>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema documents to compile.
    #[arg(required = true)]
    schemas: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    /// Schema document to normalize.
    schema: PathBuf,
    /// Write to this file instead of standard output.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Validate(args) => run_validate(args, &config),
        Command::Check(args) => run_check(args),
        Command::Normalize(args) => run_normalize(args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<CliConfig, String> {
    match path {
        Some(path) => CliConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display())),
        None => Ok(CliConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// validate command
// ---------------------------------------------------------------------------

/// One JSON document to validate and where it came from.
struct Document {
    source: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct Report {
    source: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    violation_count: usize,
    violations: Vec<Violation>,
}

fn run_validate(args: ValidateArgs, config: &CliConfig) -> Result<(), String> {
    let schema = resolve_schema(&args, config)?;
    let documents = read_documents(&args.inputs, args.ndjson)?;

    let jobs = args.jobs.unwrap_or(config.validation.jobs);
    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);
    let max_violations = args.max_violations.unwrap_or(config.output.max_violations);
    debug!(documents = documents.len(), jobs, "Validating documents");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let reports: Vec<Report> = pool.install(|| {
        documents
            .par_iter()
            .map(|document| check_document(&schema, document, max_violations))
            .collect()
    });

    for report in &reports {
        match format {
            OutputFormat::Text => print_text_report(report),
            OutputFormat::Json => {
                let line = serde_json::to_string(report)
                    .map_err(|e| format!("Failed to serialize report: {e}"))?;
                println!("{line}");
            }
        }
    }

    let failed = reports.iter().filter(|report| !report.valid).count();
    if failed > 0 {
        return Err(format!(
            "{failed} of {} document(s) failed validation",
            reports.len()
        ));
    }
    Ok(())
}

fn resolve_schema(args: &ValidateArgs, config: &CliConfig) -> Result<Schema, String> {
    if let Some(path) = &args.schema {
        return Schema::from_file(path)
            .map_err(|e| format!("Failed to load schema '{}': {e}", path.display()));
    }
    let Some(name) = &args.name else {
        return Err("Specify --schema <file>, or --name <schema> with a catalog".to_string());
    };

    let catalog = match &args.catalog_dir {
        Some(dir) => SchemaCatalog::from_dir(dir)
            .map_err(|e| format!("Failed to load catalog '{}': {e}", dir.display()))?,
        None => config
            .catalog_builder()
            .ok_or("No catalog configured: pass --catalog-dir or set catalog sources in --config")?
            .build()
            .map_err(|e| format!("Failed to load catalog: {e}"))?,
    };

    catalog
        .get(name)
        .cloned()
        .ok_or_else(|| format!("Schema '{name}' not found in catalog"))
}

fn read_documents(inputs: &[PathBuf], ndjson: bool) -> Result<Vec<Document>, String> {
    let mut documents = Vec::new();

    for input in inputs {
        let (source, text) = if input.as_os_str() == "-" {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Failed to read standard input: {e}"))?;
            ("<stdin>".to_string(), text)
        } else {
            let text = fs::read_to_string(input)
                .map_err(|e| format!("Failed to read '{}': {e}", input.display()))?;
            (input.display().to_string(), text)
        };

        if ndjson {
            documents.extend(
                text.lines()
                    .enumerate()
                    .filter(|(_, line)| !line.trim().is_empty())
                    .map(|(index, line)| Document {
                        source: format!("{source}:{}", index + 1),
                        text: line.to_string(),
                    }),
            );
        } else {
            documents.push(Document { source, text });
        }
    }

    Ok(documents)
}

fn check_document(schema: &Schema, document: &Document, max_violations: usize) -> Report {
    let value: Value = match serde_json::from_str(&document.text) {
        Ok(value) => value,
        Err(err) => {
            return Report {
                source: document.source.clone(),
                valid: false,
                error: Some(format!("invalid JSON: {err}")),
                violation_count: 0,
                violations: Vec::new(),
            };
        }
    };

    let mut violations = schema.validate(&value).into_vec();
    let violation_count = violations.len();
    if max_violations > 0 {
        violations.truncate(max_violations);
    }

    Report {
        source: document.source.clone(),
        valid: violation_count == 0,
        error: None,
        violation_count,
        violations,
    }
}

fn print_text_report(report: &Report) {
    if let Some(error) = &report.error {
        println!("{}: {error}", report.source);
        return;
    }
    if report.valid {
        println!("{}: ok", report.source);
        return;
    }

    println!("{}: {} violation(s)", report.source, report.violation_count);
    for violation in &report.violations {
        println!("  {violation}");
    }
    let hidden = report.violation_count - report.violations.len();
    if hidden > 0 {
        println!("  ... and {hidden} more");
    }
}

// ---------------------------------------------------------------------------
// check command
// ---------------------------------------------------------------------------

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failed = 0usize;

    for path in &args.schemas {
        match Schema::from_file(path) {
            Ok(schema) => {
                println!("{}: ok ({} field(s))", path.display(), schema.fields().len());
            }
            Err(SchemaError::Spec(errors)) => {
                failed += 1;
                println!("{}: {} error(s)", path.display(), errors.len());
                for error in errors.iter() {
                    println!("  {error}");
                }
            }
            Err(err) => {
                failed += 1;
                println!("{}: {err}", path.display());
            }
        }
    }

    if failed > 0 {
        return Err(format!(
            "{failed} of {} schema(s) failed to compile",
            args.schemas.len()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// normalize command
// ---------------------------------------------------------------------------

fn run_normalize(args: NormalizeArgs) -> Result<(), String> {
    let schema = Schema::from_file(&args.schema)
        .map_err(|e| format!("Failed to load schema '{}': {e}", args.schema.display()))?;
    let raw = serde_json::to_string_pretty(&schema)
        .map_err(|e| format!("Failed to serialize schema: {e}"))?;

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{raw}\n"))
                .map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
            println!("Wrote normalized schema to '{}'.", path.display());
        }
        None => println!("{raw}"),
    }
    Ok(())
}
