use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod report;

use config::{OutputFormat, ValidateOverrides};
use error::CliResult;

#[derive(Parser)]
#[command(name = "rowcheck")]
#[command(about = "rowcheck - Parallel column-count and integer validation for delimited tables")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every row and cell of a table
    Validate {
        /// Input file; omit or pass "-" to read stdin
        input: Option<PathBuf>,

        /// Worker threads (default: one per core)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Treat the first line as a header and skip it
        #[arg(long)]
        has_headers: bool,

        /// Cell delimiter
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Skip lines starting with this character
        #[arg(long)]
        comment: Option<char>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// YAML settings file; command-line flags take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate a deterministic integer table for benchmarking
    GenerateFixtures {
        /// Number of rows
        #[arg(short, long)]
        rows: usize,

        /// Cells per row
        #[arg(short, long, default_value = "10")]
        columns: usize,

        /// Seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Fraction of rows (after the first) to corrupt, 0.0 - 1.0
        #[arg(long, default_value = "0.0")]
        invalid_rate: f64,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Validate {
            input,
            workers,
            has_headers,
            delimiter,
            comment,
            format,
            config,
        } => commands::validate::execute(
            input,
            config,
            ValidateOverrides {
                workers,
                has_headers,
                delimiter,
                comment,
                format,
            },
        ),

        Commands::GenerateFixtures {
            rows,
            columns,
            seed,
            invalid_rate,
            output,
        } => commands::generate_fixtures::execute(rows, columns, seed, invalid_rate, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Diagnostics are findings, not failures: only fatal errors exit non-zero
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
