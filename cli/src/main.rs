use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

use kserial::{compile_schema_with, layout_to_json, EmitConfig, KserialError, Target};

#[derive(Parser)]
#[command(name = "kserial", version, disable_version_flag = true)]
#[command(about = "Generate record codecs from kserial schemas", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", short_alias = 'V', action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate source code from a schema
    Gen {
        /// Output language: `rust` or `ts`
        #[arg(short, long, default_value_t = Target::Rust)]
        target: Target,

        /// Input schema file (reads stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module path the generated code imports the runtime from
        #[arg(long)]
        runtime_path: Option<String>,
    },

    /// Print the byte layout of every table as JSON
    Layout {
        /// Input schema file (reads stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn read_schema(input: Option<&Path>) -> Result<String, KserialError> {
    match input {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn main() -> Result<(), KserialError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Gen { target, input, output, runtime_path } => {
            let text = read_schema(input.as_deref())?;
            let config = EmitConfig {
                target:       *target,
                runtime_path: runtime_path.clone(),
            };
            // Nothing is written unless the whole schema compiles.
            let compiled = compile_schema_with(&text, &config)?;
            if let Some(out_path) = output {
                fs::write(out_path, &compiled.output)?;
                info!(path = %out_path.display(), %target, tables = compiled.plans.len(), "wrote generated code");
            } else {
                print!("{}", compiled.output);
            }
            Ok(())
        }

        Commands::Layout { input } => {
            let text = read_schema(input.as_deref())?;
            println!("{}", layout_to_json(&text)?);
            Ok(())
        }
    }
}
