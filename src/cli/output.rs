//! CLI output formatting.
//!
//! Human-readable output uses colored symbols and `tabled` tables. In JSON
//! mode each command prints a single JSON document on stdout instead.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::money::{round_currency, round_percent};
use crate::error::Result;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

fn suppressed() -> bool {
    let config = read_config();
    config.json || config.quiet
}

/// Print a serializable result as pretty JSON.
pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

const RULE_WIDTH: usize = 48;

/// Print a section header and separator.
pub fn section(title: &str) {
    if suppressed() {
        return;
    }
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a key/value line. Shown in quiet mode too: these are the results.
pub fn key_value(label: &str, value: impl Display) {
    if is_json() {
        return;
    }
    let label = format!("{label:<20}");
    println!("  {} {value}", label.if_supports_color(Stream::Stdout, |t| t.dimmed()));
}

/// Print a successful status line.
pub fn ok(message: &str) {
    if suppressed() {
        return;
    }
    println!("  {} {}", "✓".if_supports_color(Stream::Stdout, |t| t.green()), message);
}

/// Print a warning status line.
pub fn warn(message: &str) {
    if is_json() {
        return;
    }
    println!("  {} {}", "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }
    eprintln!("  {} {}", "×".if_supports_color(Stream::Stderr, |t| t.red()), message);
}

/// Print a single-line note.
pub fn note(message: &str) {
    if suppressed() {
        return;
    }
    println!("  {message}");
}

/// Print rows as an indented table.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    if is_json() {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    for line in table.to_string().lines() {
        println!("  {line}");
    }
}

/// Currency for display, rounded to pennies.
pub fn money(value: f64) -> String {
    format!("{:.2}", round_currency(value))
}

/// Signed currency without color, for table cells.
pub fn signed(value: f64) -> String {
    let rounded = round_currency(value);
    if rounded.is_zero() {
        "+0.00".to_string()
    } else if rounded.is_sign_negative() {
        format!("{rounded:.2}")
    } else {
        format!("+{rounded:.2}")
    }
}

/// Signed currency, green for profit and red for loss.
pub fn profit(value: f64) -> String {
    let text = signed(value);
    if text.starts_with('-') {
        text.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
    } else {
        text.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    }
}

/// Percentage for display, rounded to 2 places.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", round_percent(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_is_rounded_to_pennies() {
        assert_eq!(money(48.780_487), "48.78");
        assert_eq!(money(410.000_000_1), "410.00");
    }

    #[test]
    fn percent_has_two_places() {
        assert_eq!(percent(97.619_047), "97.62%");
        assert_eq!(percent(0.0), "0.00%");
    }

    #[test]
    fn signed_money_has_explicit_sign() {
        assert_eq!(signed(2.439), "+2.44");
        assert_eq!(signed(-4.5454), "-4.55");
        assert_eq!(signed(-0.001), "+0.00");
    }
}
