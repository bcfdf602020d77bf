use clap::Args;
use serde_json::Value;

use emimitra_core::calculators::{self, SalaryBreakupInput};
use emimitra_core::input::parse_money;
use emimitra_core::salary::TaxRegime;
use emimitra_core::LendingPolicy;

use crate::input::{self, required};

/// Arguments for the salary breakup
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SalaryBreakupArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual cost to company
    #[arg(long)]
    pub ctc: Option<String>,

    /// Use the old tax regime instead of the new one
    #[arg(long)]
    pub old_regime: bool,

    /// Leave out provident fund (and the standard deduction that comes with it)
    #[arg(long)]
    pub no_pf: bool,
}

pub fn run_salary_breakup(
    args: SalaryBreakupArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let salary_input: SalaryBreakupInput = match input::read_input(args.input.as_deref())? {
        Some(salary_input) => salary_input,
        None => SalaryBreakupInput {
            ctc: parse_money("ctc", &required(args.ctc, "ctc")?)?,
            regime: if args.old_regime {
                TaxRegime::Old
            } else {
                TaxRegime::New
            },
            include_pf: !args.no_pf,
        },
    };
    let result = calculators::salary_breakup(&salary_input, policy)?;
    Ok(serde_json::to_value(result)?)
}
