//! Odds notations and conversion to and from decimal odds.
//!
//! The engine stores every price as decimal odds (`payout = stake × odds`).
//! Fractional and American prices are converted on the way in and rendered
//! on the way out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CalcError;

/// Largest denominator used when rendering fractional odds.
const MAX_FRACTION_DENOMINATOR: i64 = 1_000;

/// A betting price in decimal notation, always strictly greater than 1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Odds(f64);

impl Odds {
    /// Validate a decimal price.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOddsFormat` if `decimal` is not finite or is <= 1.0.
    pub fn new(decimal: f64) -> Result<Self, CalcError> {
        if !decimal.is_finite() {
            return Err(invalid(decimal.to_string(), "odds must be a finite number"));
        }
        if decimal <= 1.0 {
            return Err(invalid(decimal.to_string(), "decimal odds must be greater than 1.0"));
        }
        Ok(Self(decimal))
    }

    /// The decimal value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Market-implied probability, `1 / odds`.
    pub fn implied_probability(self) -> f64 {
        1.0 / self.0
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Odds {
    type Error = CalcError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Supported odds notations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    /// European decimal odds, e.g. `2.50`.
    #[default]
    Decimal,
    /// UK fractional odds, e.g. `3/2`.
    Fractional,
    /// US moneyline odds, e.g. `+150` or `-200`.
    American,
}

impl OddsFormat {
    /// Lowercase name as used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::Fractional => "fractional",
            Self::American => "american",
        }
    }
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OddsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" | "dec" => Ok(Self::Decimal),
            "fractional" | "frac" => Ok(Self::Fractional),
            "american" | "us" | "moneyline" => Ok(Self::American),
            other => Err(format!(
                "unknown odds format '{other}' (expected decimal, fractional or american)"
            )),
        }
    }
}

/// Raw odds as supplied by a caller, before conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum OddsInput {
    /// A plain number.
    Number(f64),
    /// Text such as `"5/2"`, `"+150"` or `"2.5"`.
    Text(String),
}

impl From<f64> for OddsInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OddsInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OddsInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for OddsInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A price rendered in a specific notation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum OddsValue {
    /// Decimal odds.
    Decimal { value: f64 },
    /// Fractional odds in lowest terms.
    Fractional { numerator: i64, denominator: i64 },
    /// American odds: positive for underdogs, negative for favourites.
    American { value: f64 },
}

impl OddsValue {
    /// The notation this value is expressed in.
    pub fn format(&self) -> OddsFormat {
        match self {
            Self::Decimal { .. } => OddsFormat::Decimal,
            Self::Fractional { .. } => OddsFormat::Fractional,
            Self::American { .. } => OddsFormat::American,
        }
    }
}

impl fmt::Display for OddsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal { value } => write!(f, "{value:.2}"),
            Self::Fractional {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
            Self::American { value } if *value > 0.0 => write!(f, "+{value:.0}"),
            Self::American { value } => write!(f, "{value:.0}"),
        }
    }
}

/// Convert a raw price in `format` to decimal odds.
///
/// Fractional input that is not a well-formed `N/D` with `D != 0` falls
/// back to reading the leading number of the input as decimal odds. That
/// fallback value is still subject to the `> 1.0` check.
///
/// Surrounding whitespace is ignored. `.` is the only decimal separator:
/// a comma in decimal or fractional text is an error, and American text
/// may only use commas as thousands separators (`"+1,000"`).
///
/// # Errors
///
/// Returns `InvalidOddsFormat` if the input cannot be read, American odds
/// are zero, or the converted price is not greater than 1.0.
pub fn to_decimal(input: impl Into<OddsInput>, format: OddsFormat) -> Result<Odds, CalcError> {
    let input = input.into();
    match (&input, format) {
        (OddsInput::Number(n), OddsFormat::Decimal | OddsFormat::Fractional) => Odds::new(*n),
        (OddsInput::Number(n), OddsFormat::American) => from_american(*n, &input),
        (OddsInput::Text(s), OddsFormat::Decimal) => {
            reject_decimal_comma(s)?;
            let value = parse_number(s).ok_or_else(|| invalid(s.clone(), "not a number"))?;
            Odds::new(value).map_err(|_| invalid(s.clone(), "decimal odds must be greater than 1.0"))
        }
        (OddsInput::Text(s), OddsFormat::American) => {
            let value = strip_thousands(s)
                .and_then(|digits| parse_number(&digits))
                .ok_or_else(|| invalid(s.clone(), "not a moneyline price"))?;
            from_american(value, &input)
        }
        (OddsInput::Text(s), OddsFormat::Fractional) => {
            reject_decimal_comma(s)?;
            if let Some(decimal) = parse_fraction(s) {
                return Odds::new(decimal)
                    .map_err(|_| invalid(s.clone(), "fractional odds must be positive"));
            }
            let fallback = leading_number(s)
                .ok_or_else(|| invalid(s.clone(), "expected fractional odds like 5/2"))?;
            debug!(input = %s, fallback, "malformed fractional odds, reading as decimal");
            Odds::new(fallback)
                .map_err(|_| invalid(s.clone(), "decimal odds must be greater than 1.0"))
        }
    }
}

/// Render decimal odds in `format`.
pub fn from_decimal(odds: Odds, format: OddsFormat) -> OddsValue {
    let decimal = odds.value();
    match format {
        OddsFormat::Decimal => OddsValue::Decimal { value: decimal },
        OddsFormat::Fractional => {
            let (numerator, denominator) = approx_fraction(decimal - 1.0, MAX_FRACTION_DENOMINATOR);
            OddsValue::Fractional {
                numerator,
                denominator,
            }
        }
        OddsFormat::American => {
            let value = if decimal >= 2.0 {
                (decimal - 1.0) * 100.0
            } else {
                -100.0 / (decimal - 1.0)
            };
            OddsValue::American { value }
        }
    }
}

/// Convert a raw price between two notations.
///
/// # Errors
///
/// Returns `InvalidOddsFormat` under the same conditions as [`to_decimal`].
pub fn convert_odds(
    input: impl Into<OddsInput>,
    from: OddsFormat,
    to: OddsFormat,
) -> Result<OddsValue, CalcError> {
    Ok(from_decimal(to_decimal(input, from)?, to))
}

fn invalid(input: String, reason: &'static str) -> CalcError {
    CalcError::InvalidOddsFormat { input, reason }
}

fn from_american(value: f64, input: &OddsInput) -> Result<Odds, CalcError> {
    if !value.is_finite() {
        return Err(invalid(input.to_string(), "odds must be a finite number"));
    }
    if value == 0.0 {
        return Err(invalid(input.to_string(), "american odds cannot be zero"));
    }
    let decimal = if value > 0.0 {
        value / 100.0 + 1.0
    } else {
        100.0 / value.abs() + 1.0
    };
    Odds::new(decimal).map_err(|_| invalid(input.to_string(), "american odds out of range"))
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    unsigned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A comma in decimal or fractional text is ambiguous (`"2,5"` may mean
/// 2.5 or 25), so it is refused instead of guessed at.
fn reject_decimal_comma(s: &str) -> Result<(), CalcError> {
    if s.contains(',') {
        Err(invalid(s.to_string(), "use '.' as the decimal separator"))
    } else {
        Ok(())
    }
}

/// Drop thousands separators from a moneyline price such as `"+1,000"`.
///
/// Commas are only accepted in the integer part, grouping three digits at
/// a time; anything else (`"2,5"`, `"1,00"`) is `None`.
fn strip_thousands(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if !trimmed.contains(',') {
        return Some(trimmed.to_string());
    }
    let (sign, body) = match trimmed.strip_prefix(['+', '-']) {
        Some(rest) => (&trimmed[..1], rest),
        None => ("", trimmed),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body, None),
    };

    let mut groups = int_part.split(',');
    let head = groups.next()?;
    let head_ok = (1..=3).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_digit());
    let tail_ok = groups
        .clone()
        .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
    if !head_ok || !tail_ok {
        return None;
    }

    let mut digits = format!("{sign}{head}{}", groups.collect::<String>());
    if let Some(frac_part) = frac_part {
        digits.push('.');
        digits.push_str(frac_part);
    }
    Some(digits)
}

/// Parse `N/D` into decimal odds, `None` when malformed or `D == 0`.
fn parse_fraction(s: &str) -> Option<f64> {
    let (num, den) = s.trim().split_once('/')?;
    let num = num.trim().parse::<f64>().ok()?;
    let den = den.trim().parse::<f64>().ok()?;
    if den == 0.0 || !num.is_finite() || !den.is_finite() {
        return None;
    }
    Some(num / den + 1.0)
}

/// Longest numeric prefix of `s`, e.g. `"5/0"` -> `5.0`.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    (1..=end)
        .rev()
        .find_map(|len| s.get(..len).and_then(|p| p.parse::<f64>().ok()))
}

/// Continued-fraction approximation of `x` with denominator <= `max_den`.
fn approx_fraction(x: f64, max_den: i64) -> (i64, i64) {
    let mut value = x;
    let mut a = (value + 1e-9).floor();
    let (mut h0, mut k0): (i64, i64) = (1, 0);
    let (mut h1, mut k1): (i64, i64) = (a as i64, 1);

    for _ in 0..64 {
        let frac = value - a;
        if frac.abs() < 1e-9 {
            break;
        }
        value = 1.0 / frac;
        a = (value + 1e-9).floor();
        let h2 = h0 + (a as i64) * h1;
        let k2 = k0 + (a as i64) * k1;
        if k2 > max_den {
            break;
        }
        (h0, k0, h1, k1) = (h1, k1, h2, k2);
    }

    let divisor = gcd(h1.abs(), k1).max(1);
    (h1 / divisor, k1 / divisor)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
