mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::benchmark::BenchmarkArgs;
use commands::model::ModelArgs;
use commands::rates::RatesArgs;

/// Bullion fee schedules, configurable fee models and benchmark comparison
#[derive(Parser)]
#[command(
    name = "gfc",
    version,
    about = "Gold bullion fee calculator",
    long_about = "Computes year-by-year fee ledgers for holding physical bullion. \
                  Prices the fixed benchmark schedule, models configurable fee \
                  structures and compares the two with exact decimal arithmetic."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the fixed benchmark schedule (5 or 10 year hold)
    Benchmark(BenchmarkArgs),
    /// Run a configurable fee model
    Model(ModelArgs),
    /// Run a configurable fee model and compare it to the benchmark
    Compare(ModelArgs),
    /// Show the benchmark rates or a configured rate file
    Rates(RatesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Benchmark(args) => commands::benchmark::run_benchmark(args),
        Commands::Model(args) => commands::model::run_model(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Rates(args) => commands::rates::run_rates(args),
        Commands::Version => {
            println!("gfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
