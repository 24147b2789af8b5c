mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use simple_logger::SimpleLogger;
use std::process;

use commands::extra_payment::ExtraPaymentArgs;
use commands::schedule::ScheduleArgs;
use commands::summary::SummaryArgs;

/// Fixed-rate loan amortization
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Fixed-rate loan amortization",
    long_about = "A CLI for fixed-rate loan amortization with decimal precision. \
                  Computes the monthly payment, total cost and interest, the full \
                  payment schedule, and the effect of extra monthly principal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr (-vv for every simulated month)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment, total payment and total interest
    Summary(SummaryArgs),
    /// Payment-by-payment amortization schedule
    Schedule(ScheduleArgs),
    /// Term and interest saved by paying extra principal each month
    ExtraPayment(ExtraPaymentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Yaml,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("{}: logger unavailable: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::summary::run_summary(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::ExtraPayment(args) => commands::extra_payment::run_extra_payment(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
