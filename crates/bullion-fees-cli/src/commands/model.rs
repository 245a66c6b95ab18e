use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bullion_fees_core::configurable::{self, ConfigurableInput};
use bullion_fees_core::rates::{FeeRateSet, PaymentTiming, RecurringFee};

use crate::commands::{check_whole_units, log_warnings};
use crate::input;

/// Arguments shared by `model` and `compare`
#[derive(Args)]
pub struct ModelArgs {
    /// Path to JSON/YAML input file with price, units, years and rates
    #[arg(long)]
    pub input: Option<String>,

    /// Price of one unit of bullion
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Number of units held
    #[arg(long, default_value = "1")]
    pub units: Decimal,

    /// Holding period in years (1-100)
    #[arg(long)]
    pub years: Option<u32>,

    /// Fee rate configuration file (JSON or YAML)
    #[arg(long, conflicts_with = "match_benchmark")]
    pub rates: Option<String>,

    /// Start from the benchmark rates with flat custody
    #[arg(long)]
    pub match_benchmark: bool,

    /// With --match-benchmark, keep the stepped custody tier after year 5
    #[arg(long, requires = "match_benchmark")]
    pub tiered: bool,

    /// Flat purchase fee per unit, in currency
    #[arg(long)]
    pub purchase_fee_per_unit: Option<Decimal>,

    /// Purchase fee as a fraction of notional (0.021 = 2.1%)
    #[arg(long)]
    pub purchase_fee_pct: Option<Decimal>,

    /// Annual custody rate as a fraction of notional
    #[arg(long)]
    pub custody_pct: Option<Decimal>,

    /// When custody is paid: pay_each_period (annual) or accrue_and_settle (at_redemption)
    #[arg(long)]
    pub custody_timing: Option<PaymentTiming>,

    /// Annual management rate as a fraction of notional
    #[arg(long)]
    pub management_pct: Option<Decimal>,

    /// When management is paid
    #[arg(long)]
    pub management_timing: Option<PaymentTiming>,

    /// Redemption fee as a fraction of notional
    #[arg(long)]
    pub redemption_fee_pct: Option<Decimal>,

    /// Allow fractional unit quantities
    #[arg(long)]
    pub fractional_units: bool,
}

impl ModelArgs {
    /// Resolve the full engine input: --input file, then stdin, then flags.
    pub fn resolve(&self) -> Result<ConfigurableInput, Box<dyn std::error::Error>> {
        let model_input = if let Some(ref path) = self.input {
            ConfigurableInput::from_value(input::file::read_value(path)?)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            ConfigurableInput::from_value(data)?
        } else {
            let price = self
                .price
                .ok_or("--price is required (or provide --input)")?;
            let years = self
                .years
                .ok_or("--years is required (or provide --input)")?;
            ConfigurableInput {
                unit_price: price,
                units: self.units,
                horizon_years: years,
                rates: self.rate_set()?,
            }
        };
        check_whole_units(model_input.units, self.fractional_units)?;
        Ok(model_input)
    }

    /// Base rates from a file or preset, then individual flag overrides.
    fn rate_set(&self) -> Result<FeeRateSet, Box<dyn std::error::Error>> {
        let mut rates = if let Some(ref path) = self.rates {
            input::file::read_rates(path)?
        } else if self.match_benchmark && self.tiered {
            FeeRateSet::matching_benchmark_tiered()
        } else if self.match_benchmark {
            FeeRateSet::matching_benchmark()
        } else {
            FeeRateSet::zero()
        };

        if let Some(v) = self.purchase_fee_per_unit {
            rates.purchase_fee_per_unit = v;
        }
        if let Some(v) = self.purchase_fee_pct {
            rates.purchase_fee_pct = v;
        }
        if let Some(v) = self.redemption_fee_pct {
            rates.redemption_fee_pct = v;
        }
        override_recurring(&mut rates.custody, self.custody_pct, self.custody_timing);
        override_recurring(
            &mut rates.management,
            self.management_pct,
            self.management_timing,
        );
        Ok(rates)
    }
}

fn override_recurring(fee: &mut RecurringFee, rate: Option<Decimal>, timing: Option<PaymentTiming>) {
    let timing = timing.unwrap_or(fee.timing);
    match rate {
        Some(r) => *fee = RecurringFee::flat(r, timing),
        None => fee.timing = timing,
    }
}

pub fn run_model(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let model_input = args.resolve()?;
    log::debug!(
        "model: {} units at {} over {} years",
        model_input.units,
        model_input.unit_price,
        model_input.horizon_years
    );
    let result = configurable::calculate_configurable(&model_input)?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
