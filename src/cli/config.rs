//! Handler for the `config` command group.

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Execute `config show`.
pub fn show(config: &Config) -> Result<()> {
    if output::is_json() {
        return output::emit_json(config);
    }

    output::section("Defaults");
    output::key_value("Odds format", config.defaults.odds_format);
    output::key_value("Commission", output::percent(config.defaults.commission * 100.0));
    output::key_value("Commission model", config.defaults.commission_model);

    output::section("Risk");
    output::key_value("Risk-free tolerance", output::money(config.risk.risk_free_tolerance));
    output::key_value(
        "Kelly cap",
        output::percent(config.risk.kelly_max_fraction * 100.0),
    );

    output::section("Logging");
    output::key_value("Level", &config.logging.level);
    output::key_value("Format", &config.logging.format);

    output::section("TOML");
    for line in config.to_toml()?.lines() {
        output::note(line);
    }
    Ok(())
}

/// Execute `config validate`.
///
/// The file has already been parsed and validated by the time this runs;
/// a bad file fails before dispatch.
pub fn validate(config: &Config) -> Result<()> {
    if output::is_json() {
        return output::emit_json(&serde_json::json!({
            "type": "config_valid",
            "payload": config,
        }));
    }

    output::section("Config Validation");
    output::ok("Config file is valid");
    if config.defaults.commission == 0.0 {
        output::warn("Commission is 0%: exchange prices will be treated as commission-free");
    }
    Ok(())
}
