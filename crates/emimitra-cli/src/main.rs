mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::eligibility::EligibilityArgs;
use commands::loans::{EmiArgs, HomeLoanArgs, ProductLoanArgs, VehicleLoanArgs};
use commands::salary::SalaryBreakupArgs;

/// Loan EMI, eligibility and salary breakup calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI, eligibility and salary breakup calculations",
    long_about = "A CLI for reducing-balance loan calculations with decimal precision. \
                  Supports EMI and amortisation schedules, home, vehicle and product \
                  loan reports, salary-based eligibility with rate comparison and \
                  advice, and an illustrative salary breakup."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Lending policy file (YAML or JSON) overriding the built-in thresholds
    #[arg(long, env = "EMI_POLICY", global = true)]
    policy: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the EMI and amortisation schedule of a loan
    Emi(EmiArgs),
    /// Home loan report (tenure in years, yearly summary)
    HomeLoan(HomeLoanArgs),
    /// Vehicle loan report with an income affordability check
    VehicleLoan(VehicleLoanArgs),
    /// Product loan report with down payment feedback and insights
    ProductLoan(ProductLoanArgs),
    /// Salary-based loan eligibility with comparison, tips and credit impact
    Eligibility(EligibilityArgs),
    /// Check salary-based inputs against their allowed ranges
    Validate(EligibilityArgs),
    /// Eligible amount at each rate of the comparison ladder
    CompareRates(EligibilityArgs),
    /// Monthly salary breakup and tax estimate from annual CTC
    SalaryBreakup(SalaryBreakupArgs),
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let policy = || input::policy::load_policy(cli.policy.as_deref());
    let result: Result<Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::HomeLoan(args) => commands::loans::run_home_loan(args),
        Commands::VehicleLoan(args) => {
            policy().and_then(|p| commands::loans::run_vehicle_loan(args, &p))
        }
        Commands::ProductLoan(args) => {
            policy().and_then(|p| commands::loans::run_product_loan(args, &p))
        }
        Commands::Eligibility(args) => {
            policy().and_then(|p| commands::eligibility::run_eligibility(args, &p))
        }
        Commands::Validate(args) => commands::eligibility::run_validate(args),
        Commands::CompareRates(args) => {
            policy().and_then(|p| commands::eligibility::run_compare_rates(args, &p))
        }
        Commands::SalaryBreakup(args) => {
            policy().and_then(|p| commands::salary::run_salary_breakup(args, &p))
        }
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
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
