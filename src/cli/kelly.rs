//! Handler for `layline kelly`.

use serde::Serialize;

use crate::cli::output;
use crate::cli::KellyArgs;
use crate::config::Config;
use crate::domain::{kelly_stake, to_decimal, KellyInput, KellyStake, Odds};
use crate::error::Result;

#[derive(Serialize)]
struct KellyReport {
    odds: Odds,
    probability: f64,
    max_fraction: f64,
    #[serde(flatten)]
    result: KellyStake,
}

/// Execute `kelly`: size a back bet from an estimated edge.
pub fn execute(args: &KellyArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.defaults.odds_format);
    let odds = to_decimal(args.odds.as_str(), format)?;
    let max_fraction = args.max_fraction.unwrap_or(config.risk.kelly_max_fraction);

    let result = kelly_stake(&KellyInput {
        odds,
        probability: args.probability,
        max_fraction,
        bankroll: args.bankroll,
    })?;

    if output::is_json() {
        return output::emit_json(&KellyReport {
            odds,
            probability: args.probability,
            max_fraction,
            result,
        });
    }

    output::section(&format!("Kelly @ {odds}"));
    output::key_value("Edge per unit", output::percent(result.expected_value_per_unit * 100.0));
    output::key_value("Full Kelly", output::percent(result.full_fraction * 100.0));
    output::key_value("Stake fraction", output::percent(result.fraction * 100.0));
    if let Some(stake) = result.stake {
        output::key_value("Stake", output::money(stake));
    }
    output::key_value("Log growth", format!("{:.5}", result.growth_rate));

    if result.fraction == 0.0 {
        output::warn("No edge at this price: stake nothing");
    } else if result.fraction < result.full_fraction {
        output::note(&format!(
            "Capped at {} of bankroll",
            output::percent(max_fraction * 100.0)
        ));
    }
    Ok(())
}
