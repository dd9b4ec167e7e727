//! Accumulator (parlay) bets hedged as a single lay.
//!
//! The back price of an accumulator is the product of its legs' back odds,
//! and the combined lay price is the product of their lay odds. Many
//! bookmakers refund the stake when exactly one leg lets the bet down,
//! either as cash or as a free bet worth a fraction of its face value.

use serde::Serialize;

use super::error::CalcError;
use super::leg::{validate_legs, Commission, Leg};
use super::matched::{MatchedBet, MatchedBetKind};
use super::odds::Odds;

/// Refund paid when exactly one leg loses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccaRefund {
    /// No insurance on the accumulator.
    #[default]
    None,
    /// Stake returned as cash.
    Cash,
    /// Stake returned as a free bet, of which `retention` (0..=1) is
    /// expected to be extracted.
    FreeBet { retention: f64 },
}

impl AccaRefund {
    /// # Errors
    ///
    /// Returns `OutOfRange` for a retention outside `[0, 1]`.
    pub fn free_bet(retention: f64) -> Result<Self, CalcError> {
        if retention.is_finite() && (0.0..=1.0).contains(&retention) {
            Ok(Self::FreeBet { retention })
        } else {
            Err(CalcError::OutOfRange {
                field: "free bet retention",
                value: retention,
            })
        }
    }

    /// Cash value of the refund on `stake`.
    pub fn value(self, stake: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Cash => stake,
            Self::FreeBet { retention } => stake * retention,
        }
    }
}

/// Product of a set of decimal prices.
///
/// # Errors
///
/// Returns `InsufficientLegs` for fewer than two prices.
pub fn combined_odds(odds: impl IntoIterator<Item = Odds>) -> Result<Odds, CalcError> {
    let (count, product) = odds
        .into_iter()
        .fold((0usize, 1.0), |(n, acc), o| (n + 1, acc * o.value()));
    if count < 2 {
        return Err(CalcError::InsufficientLegs { valid: count });
    }
    Odds::new(product)
}

/// A qualifying accumulator laid at its combined price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accumulator {
    bet: MatchedBet,
    legs: usize,
    refund: AccaRefund,
}

impl Accumulator {
    /// Combine `legs`, each of which must carry lay odds.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientLegs` or `UnknownLeg` from leg validation,
    /// `MissingLayOdds` for a back-only leg, and `InvalidStakeAmount` for a
    /// non-positive stake.
    pub fn new(
        legs: &[Leg],
        commission: Commission,
        back_stake: f64,
        refund: AccaRefund,
    ) -> Result<Self, CalcError> {
        validate_legs(legs)?;
        let lay_prices = legs
            .iter()
            .map(Leg::require_lay_odds)
            .collect::<Result<Vec<_>, _>>()?;

        let back = combined_odds(legs.iter().map(Leg::back_odds))?;
        let lay = combined_odds(lay_prices)?;
        let bet = MatchedBet::new(back, lay, commission, back_stake, MatchedBetKind::Qualifying)?;

        Ok(Self {
            bet,
            legs: legs.len(),
            refund,
        })
    }

    /// The combined back/lay pair.
    pub fn bet(&self) -> &MatchedBet {
        &self.bet
    }

    pub fn leg_count(&self) -> usize {
        self.legs
    }

    pub fn refund(&self) -> AccaRefund {
        self.refund
    }

    pub fn refund_value(&self) -> f64 {
        self.refund.value(self.bet.back_stake())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(v: f64) -> Odds {
        Odds::new(v).unwrap()
    }

    fn leg(id: &str, back: f64, lay: f64) -> Leg {
        Leg::new(id, odds(back)).with_lay_odds(odds(lay))
    }

    #[test]
    fn combined_odds_is_the_product() {
        let combined = combined_odds([odds(2.0), odds(1.5), odds(3.0)]).unwrap();
        assert!((combined.value() - 9.0).abs() < 1e-12);
        assert_eq!(
            combined_odds([odds(2.0)]),
            Err(CalcError::InsufficientLegs { valid: 1 })
        );
    }

    #[test]
    fn accumulator_lays_the_combined_price() {
        let legs = [leg("a", 2.0, 2.1), leg("b", 1.5, 1.55), leg("c", 3.0, 3.1)];
        let acca = Accumulator::new(&legs, Commission::new(0.02).unwrap(), 10.0, AccaRefund::None)
            .unwrap();

        assert_eq!(acca.leg_count(), 3);
        assert!((acca.bet().back_odds().value() - 9.0).abs() < 1e-12);
        assert!((acca.bet().lay_odds().value() - 10.0905).abs() < 1e-9);
        assert!((acca.bet().back_wins_profit() - acca.bet().lay_wins_profit()).abs() < 1e-9);
        assert_eq!(acca.refund_value(), 0.0);
    }

    #[test]
    fn refund_values() {
        assert_eq!(AccaRefund::None.value(10.0), 0.0);
        assert_eq!(AccaRefund::Cash.value(10.0), 10.0);
        assert_eq!(AccaRefund::free_bet(0.7).unwrap().value(10.0), 7.0);
        assert!(AccaRefund::free_bet(1.2).is_err());
        assert!(AccaRefund::free_bet(-0.1).is_err());
    }

    #[test]
    fn every_leg_needs_a_lay_price() {
        let legs = [leg("a", 2.0, 2.1), Leg::new("b", odds(1.5))];
        assert_eq!(
            Accumulator::new(&legs, Commission::ZERO, 10.0, AccaRefund::Cash),
            Err(CalcError::MissingLayOdds { leg: "b".into() })
        );
    }

    #[test]
    fn single_leg_is_not_an_accumulator() {
        let legs = [leg("a", 2.0, 2.1)];
        assert!(matches!(
            Accumulator::new(&legs, Commission::ZERO, 10.0, AccaRefund::Cash),
            Err(CalcError::InsufficientLegs { valid: 1 })
        ));
    }
}
