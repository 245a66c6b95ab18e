use clap::Args;
use serde_json::Value;

use bullion_fees_core::fixed_schedule;
use bullion_fees_core::rates;

use crate::input;

/// Arguments for the rate table
#[derive(Args)]
pub struct RatesArgs {
    /// Show a configured rate file instead of the benchmark schedule
    #[arg(long)]
    pub rates: Option<String>,
}

pub fn run_rates(args: RatesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entries = match args.rates {
        Some(ref path) => rates::configured_rates(&input::file::read_rates(path)?),
        None => fixed_schedule::fixed_schedule_rates(),
    };
    Ok(serde_json::to_value(entries)?)
}
