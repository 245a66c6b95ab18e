use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use bullion_fees_core::fixed_schedule::{self, FixedHorizon, FixedScheduleInput};

use crate::commands::{check_whole_units, log_warnings};
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HorizonArg {
    /// 5-year hold
    #[value(alias = "5")]
    Short,
    /// 10-year hold
    #[value(alias = "10")]
    Long,
}

impl From<HorizonArg> for FixedHorizon {
    fn from(arg: HorizonArg) -> Self {
        match arg {
            HorizonArg::Short => FixedHorizon::Short,
            HorizonArg::Long => FixedHorizon::Long,
        }
    }
}

/// Arguments for the fixed benchmark schedule
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Price of one unit of bullion
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Number of units held
    #[arg(long, default_value = "1")]
    pub units: Decimal,

    /// Benchmark holding period
    #[arg(long, value_enum, default_value = "short")]
    pub horizon: HorizonArg,

    /// Allow fractional unit quantities
    #[arg(long)]
    pub fractional_units: bool,
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input = if let Some(ref path) = args.input {
        FixedScheduleInput::from_value(input::file::read_value(path)?)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        FixedScheduleInput::from_value(data)?
    } else {
        let price = args
            .price
            .ok_or("--price is required (or provide --input)")?;
        FixedScheduleInput {
            unit_price: price,
            units: args.units,
            horizon: args.horizon.into(),
        }
    };
    check_whole_units(schedule_input.units, args.fractional_units)?;

    log::debug!(
        "benchmark: {} units at {} over {} years",
        schedule_input.units,
        schedule_input.unit_price,
        schedule_input.horizon.years()
    );
    let result = fixed_schedule::calculate_fixed_schedule(&schedule_input)?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
