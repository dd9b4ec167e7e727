//! Handler for `layline convert`.

use serde::Serialize;

use crate::cli::output;
use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::domain::{from_decimal, to_decimal, OddsFormat, OddsValue};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ConvertReport {
    input: String,
    from: OddsFormat,
    decimal: OddsValue,
    fractional: OddsValue,
    american: OddsValue,
    implied_probability: f64,
}

/// Execute `convert`: show a price in every notation.
pub fn execute(args: &ConvertArgs, config: &Config) -> Result<()> {
    let from = args.from.unwrap_or(config.defaults.odds_format);
    let odds = to_decimal(args.value.as_str(), from)?;

    let report = ConvertReport {
        input: args.value.clone(),
        from,
        decimal: from_decimal(odds, OddsFormat::Decimal),
        fractional: from_decimal(odds, OddsFormat::Fractional),
        american: from_decimal(odds, OddsFormat::American),
        implied_probability: odds.implied_probability(),
    };

    if output::is_json() {
        return output::emit_json(&report);
    }

    output::section(&format!("{} ({from})", report.input));
    output::key_value("Decimal", &report.decimal);
    output::key_value("Fractional", &report.fractional);
    output::key_value("American", &report.american);
    output::key_value(
        "Implied probability",
        output::percent(report.implied_probability * 100.0),
    );
    Ok(())
}
