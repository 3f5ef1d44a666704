use anyhow::Context;
use clap::{Parser, Subcommand};
use fhir::Bundle;
use mapper_core::{
    classify, convert_to_fhir, validate_bundle, validator_config_from_env_values, FieldValue,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mapper")]
#[command(about = "FHIR record mapper CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON record into a FHIR transaction Bundle
    Convert {
        /// Path to a JSON object of field name to value
        record: PathBuf,
        /// Write the bundle here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert a record and run the external validator over the bundle
    Validate {
        /// Path to a JSON object of field name to value
        record: PathBuf,
    },
    /// Print the meaning inferred for a single field
    Classify {
        /// Field name
        field: String,
        /// Field value (parsed as JSON when possible, otherwise text)
        value: String,
    },
    /// Check an existing Bundle file against the transaction Bundle schema
    Check {
        /// Path to a Bundle JSON file
        bundle: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert { record, output }) => {
            let bundle = convert_to_fhir(&read_json(&record)?)?;
            let rendered = Bundle::render(&bundle)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Wrote bundle with {} entries to {}",
                        bundle.entry.len(),
                        path.display()
                    );
                }
                None => println!("{rendered}"),
            }
        }
        Some(Commands::Validate { record }) => {
            let validator = validator_config_from_env_values(
                std::env::var("MAPPER_VALIDATOR_PROGRAM").ok(),
                std::env::var("MAPPER_VALIDATOR_JAR").ok(),
                std::env::var("MAPPER_FHIR_VERSION").ok(),
            )?;
            let bundle = convert_to_fhir(&read_json(&record)?)?;
            let report = validate_bundle(&validator, &bundle)?;

            print!("{}", report.stdout);
            eprint!("{}", report.stderr);
            if !report.valid {
                eprintln!("Validator rejected bundle (exit code {})", report.returncode);
                std::process::exit(if report.returncode > 0 { report.returncode } else { 1 });
            }
        }
        Some(Commands::Classify { field, value }) => {
            println!("{}", classify(&field, &parse_field_value(&value)));
        }
        Some(Commands::Check { bundle }) => {
            let text = std::fs::read_to_string(&bundle)
                .with_context(|| format!("failed to read {}", bundle.display()))?;
            match Bundle::parse(&text) {
                Ok(parsed) => println!("Valid transaction bundle with {} entries", parsed.entry.len()),
                Err(e) => {
                    eprintln!("Invalid bundle: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("Use 'mapper --help' for commands");
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Interpret a command line value the way it would arrive in a JSON record.
fn parse_field_value(raw: &str) -> FieldValue {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => FieldValue::from(&value),
        Err(_) => FieldValue::Text(raw.trim().to_string()),
    }
}
