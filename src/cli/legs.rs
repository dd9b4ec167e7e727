//! Parsing of `--leg`, `--custom-stake` and `--place-terms` values.

use std::str::FromStr;

use crate::domain::{to_decimal, Commission, Leg, OddsFormat};
use crate::error::Result;

/// A `NAME=ODDS[@COMMISSION%]` leg as typed on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct LegArg {
    pub name: String,
    pub odds: String,
    pub commission_percent: Option<f64>,
}

impl FromStr for LegArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=ODDS[@COMMISSION%], got '{s}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("leg name is empty in '{s}'"));
        }

        let (odds, commission_percent) = match rest.split_once('@') {
            Some((odds, commission)) => {
                let commission = commission.trim().trim_end_matches('%');
                let percent = commission
                    .parse::<f64>()
                    .map_err(|_| format!("invalid commission '{commission}' in '{s}'"))?;
                (odds, Some(percent))
            }
            None => (rest, None),
        };

        let odds = odds.trim();
        if odds.is_empty() {
            return Err(format!("odds are empty in '{s}'"));
        }

        Ok(Self {
            name: name.to_string(),
            odds: odds.to_string(),
            commission_percent,
        })
    }
}

impl LegArg {
    /// Convert to an engine leg, falling back to `default_commission`.
    pub fn to_leg(&self, format: OddsFormat, default_commission: Commission) -> Result<Leg> {
        let odds = to_decimal(self.odds.as_str(), format)?;
        let commission = match self.commission_percent {
            Some(percent) => Commission::from_percent(percent)?,
            None => default_commission,
        };
        Ok(Leg::new(self.name.as_str(), odds).with_commission(commission))
    }
}

/// Convert every leg, reporting the first invalid one in input order.
pub fn build_legs(args: &[LegArg], format: OddsFormat, commission: Commission) -> Result<Vec<Leg>> {
    args.iter().map(|arg| arg.to_leg(format, commission)).collect()
}

/// A `NAME=BACK:LAY` accumulator leg.
#[derive(Debug, Clone, PartialEq)]
pub struct AccaLegArg {
    pub name: String,
    pub back_odds: String,
    pub lay_odds: String,
}

impl FromStr for AccaLegArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = || format!("expected NAME=BACK:LAY, got '{s}'");
        let (name, prices) = s.split_once('=').ok_or_else(malformed)?;
        let (back, lay) = prices.split_once(':').ok_or_else(malformed)?;
        let (name, back, lay) = (name.trim(), back.trim(), lay.trim());
        if name.is_empty() || back.is_empty() || lay.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            name: name.to_string(),
            back_odds: back.to_string(),
            lay_odds: lay.to_string(),
        })
    }
}

impl AccaLegArg {
    pub fn to_leg(&self, format: OddsFormat) -> Result<Leg> {
        let back = to_decimal(self.back_odds.as_str(), format)?;
        let lay = to_decimal(self.lay_odds.as_str(), format)?;
        Ok(Leg::new(self.name.as_str(), back).with_lay_odds(lay))
    }
}

/// Parse place terms as a fraction of the win odds: `1/4`, `1/5` or `0.25`.
pub fn parse_place_terms(s: &str) -> std::result::Result<f64, String> {
    let s = s.trim();
    let terms = match s.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok();
            let den = den.trim().parse::<f64>().ok().filter(|d| *d != 0.0);
            num.zip(den).map(|(n, d)| n / d)
        }
        None => s.parse::<f64>().ok(),
    };
    terms
        .filter(|t| t.is_finite() && *t > 0.0 && *t <= 1.0)
        .ok_or_else(|| format!("invalid place terms '{s}' (expected e.g. 1/4 or 0.2)"))
}

/// Parse `NAME=AMOUNT` for `--custom-stake`.
pub fn parse_custom_stake(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{s}'"))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid amount '{amount}'"))?;
    Ok((name.trim().to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalcError;
    use crate::error::Error;

    #[test]
    fn parses_name_and_odds() {
        let arg: LegArg = "home=2.10".parse().unwrap();
        assert_eq!(arg.name, "home");
        assert_eq!(arg.odds, "2.10");
        assert_eq!(arg.commission_percent, None);
    }

    #[test]
    fn parses_commission_suffix() {
        let arg: LegArg = "draw=5/2@2%".parse().unwrap();
        assert_eq!(arg.odds, "5/2");
        assert_eq!(arg.commission_percent, Some(2.0));

        let arg: LegArg = "away=+150@5".parse().unwrap();
        assert_eq!(arg.odds, "+150");
        assert_eq!(arg.commission_percent, Some(5.0));
    }

    #[test]
    fn rejects_malformed_legs() {
        assert!("2.10".parse::<LegArg>().is_err());
        assert!("=2.10".parse::<LegArg>().is_err());
        assert!("home=".parse::<LegArg>().is_err());
        assert!("home=2.1@x".parse::<LegArg>().is_err());
    }

    #[test]
    fn to_leg_uses_default_commission() {
        let arg: LegArg = "home=3/2".parse().unwrap();
        let leg = arg
            .to_leg(OddsFormat::Fractional, Commission::new(0.02).unwrap())
            .unwrap();
        assert_eq!(leg.back_odds().value(), 2.5);
        assert_eq!(leg.commission().rate(), 0.02);
    }

    #[test]
    fn build_legs_reports_first_invalid_leg() {
        let args: Vec<LegArg> = ["a=1.0", "b=0.5"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let err = build_legs(&args, OddsFormat::Decimal, Commission::ZERO).unwrap_err();
        match err {
            Error::Calc(CalcError::InvalidOddsFormat { input, .. }) => assert_eq!(input, "1.0"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn acca_leg_has_back_and_lay() {
        let arg: AccaLegArg = "arsenal=2.0:2.1".parse().unwrap();
        assert_eq!(arg.name, "arsenal");
        let leg = arg.to_leg(OddsFormat::Decimal).unwrap();
        assert_eq!(leg.back_odds().value(), 2.0);
        assert_eq!(leg.lay_odds().map(|o| o.value()), Some(2.1));

        assert!("arsenal=2.0".parse::<AccaLegArg>().is_err());
        assert!("arsenal=:2.1".parse::<AccaLegArg>().is_err());
        assert!("2.0:2.1".parse::<AccaLegArg>().is_err());
    }

    #[test]
    fn place_terms() {
        assert_eq!(parse_place_terms("1/4"), Ok(0.25));
        assert_eq!(parse_place_terms(" 1/5 "), Ok(0.2));
        assert_eq!(parse_place_terms("0.25"), Ok(0.25));
        assert!(parse_place_terms("1/0").is_err());
        assert!(parse_place_terms("5/4").is_err());
        assert!(parse_place_terms("quarter").is_err());
    }

    #[test]
    fn custom_stake_pair() {
        assert_eq!(
            parse_custom_stake("home=25"),
            Ok(("home".to_string(), 25.0))
        );
        assert!(parse_custom_stake("home").is_err());
    }
}
