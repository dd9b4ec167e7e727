//! Two-sided back/lay matched bets.
//!
//! A back bet at a bookmaker is hedged by a lay bet on the same selection
//! at an exchange. The lay stake is chosen so both outcomes return (nearly)
//! the same amount. When the exchange only fills part of the lay, the
//! unfilled share of the hedge is simply missing: the back bet still runs
//! in full.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{require_positive, CalcError};
use super::leg::{Commission, Leg};
use super::odds::Odds;

/// Which promotion the back bet is placed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBetKind {
    /// Cash stake; a small loss unlocks the offer.
    #[default]
    Qualifying,
    /// Free bet whose stake is not returned with winnings.
    FreeBetSnr,
    /// Free bet whose stake is returned with winnings.
    FreeBetSr,
}

impl MatchedBetKind {
    pub fn is_free_bet(self) -> bool {
        !matches!(self, Self::Qualifying)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qualifying => "qualifying",
            Self::FreeBetSnr => "snr",
            Self::FreeBetSr => "sr",
        }
    }
}

impl fmt::Display for MatchedBetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchedBetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qualifying" | "normal" => Ok(Self::Qualifying),
            "snr" | "free-bet-snr" | "free_bet_snr" => Ok(Self::FreeBetSnr),
            "sr" | "free-bet-sr" | "free_bet_sr" => Ok(Self::FreeBetSr),
            other => Err(format!(
                "unknown bet kind '{other}' (expected qualifying, snr or sr)"
            )),
        }
    }
}

/// A back bet hedged by a lay bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchedBet {
    back_odds: Odds,
    lay_odds: Odds,
    commission: Commission,
    back_stake: f64,
    kind: MatchedBetKind,
    /// Share of the ideal lay stake actually matched, in (0, 1].
    matched_fraction: f64,
}

impl MatchedBet {
    /// # Errors
    ///
    /// Returns `InvalidStakeAmount` if `back_stake` is not strictly positive.
    pub fn new(
        back_odds: Odds,
        lay_odds: Odds,
        commission: Commission,
        back_stake: f64,
        kind: MatchedBetKind,
    ) -> Result<Self, CalcError> {
        Ok(Self {
            back_odds,
            lay_odds,
            commission,
            back_stake: require_positive("back stake", back_stake)?,
            kind,
            matched_fraction: 1.0,
        })
    }

    /// Only `fraction` of the ideal lay stake was matched at the exchange.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` unless `fraction` is in (0, 1].
    pub fn with_matched_fraction(mut self, fraction: f64) -> Result<Self, CalcError> {
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
            return Err(CalcError::OutOfRange {
                field: "matched fraction",
                value: fraction,
            });
        }
        self.matched_fraction = fraction;
        Ok(self)
    }

    /// Build from a leg carrying both back and lay odds.
    ///
    /// # Errors
    ///
    /// Returns `MissingLayOdds` for a back-only leg, or `InvalidStakeAmount`.
    pub fn from_leg(leg: &Leg, back_stake: f64, kind: MatchedBetKind) -> Result<Self, CalcError> {
        let lay_odds = leg.require_lay_odds()?;
        Self::new(leg.back_odds(), lay_odds, leg.commission(), back_stake, kind)
    }

    pub fn back_odds(&self) -> Odds {
        self.back_odds
    }

    pub fn lay_odds(&self) -> Odds {
        self.lay_odds
    }

    pub fn commission(&self) -> Commission {
        self.commission
    }

    pub fn back_stake(&self) -> f64 {
        self.back_stake
    }

    pub fn kind(&self) -> MatchedBetKind {
        self.kind
    }

    pub fn matched_fraction(&self) -> f64 {
        self.matched_fraction
    }

    pub fn is_partially_matched(&self) -> bool {
        self.matched_fraction < 1.0
    }

    /// Lay stake that would fully hedge the back bet.
    pub fn full_lay_stake(&self) -> f64 {
        let (b, l, c) = (self.back_odds.value(), self.lay_odds.value(), self.commission.rate());
        let covered = match self.kind {
            MatchedBetKind::FreeBetSnr => self.back_stake * (b - 1.0),
            MatchedBetKind::Qualifying | MatchedBetKind::FreeBetSr => self.back_stake * b,
        };
        covered / (l - c)
    }

    /// Stake laid at the exchange: the matched share of the full hedge.
    pub fn lay_stake(&self) -> f64 {
        self.full_lay_stake() * self.matched_fraction
    }

    /// Part of the full hedge left unmatched.
    pub fn unmatched_lay_stake(&self) -> f64 {
        self.full_lay_stake() - self.lay_stake()
    }

    /// Exchange-side loss if the selection wins.
    pub fn liability(&self) -> f64 {
        self.lay_stake() * (self.lay_odds.value() - 1.0)
    }

    /// Net result when the back bet wins and the lay bet loses.
    pub fn back_wins_profit(&self) -> f64 {
        let b = self.back_odds.value();
        let back_return = match self.kind {
            MatchedBetKind::FreeBetSr => self.back_stake * b,
            MatchedBetKind::Qualifying | MatchedBetKind::FreeBetSnr => self.back_stake * (b - 1.0),
        };
        back_return - self.liability()
    }

    /// Net result when the back bet loses and the lay bet wins.
    pub fn lay_wins_profit(&self) -> f64 {
        let lay_return = self.lay_stake() * (1.0 - self.commission.rate());
        if self.kind.is_free_bet() {
            lay_return
        } else {
            lay_return - self.back_stake
        }
    }

    /// Own money committed: back stake plus liability, or liability only
    /// when the back stake is a free bet.
    pub fn capital_at_risk(&self) -> f64 {
        if self.kind.is_free_bet() {
            self.liability()
        } else {
            self.back_stake + self.liability()
        }
    }
}

/// An early-payout promotion: the back bet is paid out as a winner if the
/// trigger (e.g. a two-goal lead) occurs, whatever the final result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EarlyPayout {
    bet: MatchedBet,
}

impl EarlyPayout {
    /// # Errors
    ///
    /// Returns `InvalidStakeAmount` if `back_stake` is not strictly positive.
    pub fn new(
        back_odds: Odds,
        lay_odds: Odds,
        commission: Commission,
        back_stake: f64,
    ) -> Result<Self, CalcError> {
        let bet = MatchedBet::new(
            back_odds,
            lay_odds,
            commission,
            back_stake,
            MatchedBetKind::Qualifying,
        )?;
        Ok(Self { bet })
    }

    /// The underlying qualifying back/lay pair.
    pub fn bet(&self) -> &MatchedBet {
        &self.bet
    }

    pub(crate) fn back_profit(&self) -> f64 {
        self.bet.back_stake * (self.bet.back_odds.value() - 1.0)
    }

    pub(crate) fn lay_profit(&self) -> f64 {
        self.bet.lay_stake() * (1.0 - self.bet.commission.rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(v: f64) -> Odds {
        Odds::new(v).unwrap()
    }

    fn bet(kind: MatchedBetKind) -> MatchedBet {
        MatchedBet::new(
            odds(3.0),
            odds(3.1),
            Commission::new(0.02).unwrap(),
            100.0,
            kind,
        )
        .unwrap()
    }

    #[test]
    fn qualifying_bet_equalises_outcomes() {
        let b = bet(MatchedBetKind::Qualifying);
        assert!((b.lay_stake() - 97.402_597).abs() < 1e-5);
        assert!((b.liability() - 204.545_454).abs() < 1e-5);
        assert!((b.back_wins_profit() - b.lay_wins_profit()).abs() < 1e-9);
        assert!(b.back_wins_profit() < 0.0);
    }

    #[test]
    fn snr_free_bet_locks_in_profit() {
        let b = bet(MatchedBetKind::FreeBetSnr);
        assert!((b.lay_stake() - 64.935_064).abs() < 1e-5);
        assert!(b.back_wins_profit() > 60.0);
        assert!((b.back_wins_profit() - b.lay_wins_profit()).abs() < 1e-9);
        assert_eq!(b.capital_at_risk(), b.liability());
    }

    #[test]
    fn sr_free_bet_uses_full_return() {
        let b = bet(MatchedBetKind::FreeBetSr);
        assert!((b.back_wins_profit() - b.lay_wins_profit()).abs() < 1e-9);
        assert!(b.back_wins_profit() > bet(MatchedBetKind::FreeBetSnr).back_wins_profit());
    }

    #[test]
    fn zero_commission_gives_exact_hedge() {
        let b = MatchedBet::new(
            odds(2.0),
            odds(2.0),
            Commission::ZERO,
            50.0,
            MatchedBetKind::Qualifying,
        )
        .unwrap();
        assert!(b.back_wins_profit().abs() < 1e-12);
        assert!(b.lay_wins_profit().abs() < 1e-12);
    }

    #[test]
    fn stake_must_be_positive() {
        let err = MatchedBet::new(
            odds(2.0),
            odds(2.1),
            Commission::ZERO,
            0.0,
            MatchedBetKind::Qualifying,
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::InvalidStakeAmount { field: "back stake", .. }));
    }

    #[test]
    fn from_leg_requires_lay_odds() {
        let leg = Leg::new("fav", odds(2.0));
        assert!(matches!(
            MatchedBet::from_leg(&leg, 10.0, MatchedBetKind::Qualifying),
            Err(CalcError::MissingLayOdds { .. })
        ));
        let leg = leg.with_lay_odds(odds(2.1));
        assert!(MatchedBet::from_leg(&leg, 10.0, MatchedBetKind::Qualifying).is_ok());
    }

    #[test]
    fn partial_match_lays_only_the_matched_share() {
        let full = bet(MatchedBetKind::Qualifying);
        let half = full.with_matched_fraction(0.5).unwrap();

        assert!(half.is_partially_matched());
        assert!((half.lay_stake() - 48.701_298).abs() < 1e-5);
        assert!((half.unmatched_lay_stake() - half.lay_stake()).abs() < 1e-9);
        assert!((half.liability() - 102.272_727).abs() < 1e-5);
        // Back bet runs in full against a half-sized hedge.
        assert!((half.back_wins_profit() - 97.727_272).abs() < 1e-5);
        assert!((half.lay_wins_profit() + 52.272_727).abs() < 1e-5);
    }

    #[test]
    fn fully_matched_is_the_plain_hedge() {
        let full = bet(MatchedBetKind::Qualifying);
        let same = full.with_matched_fraction(1.0).unwrap();
        assert_eq!(same, full);
        assert!(!same.is_partially_matched());
        assert_eq!(same.unmatched_lay_stake(), 0.0);
    }

    #[test]
    fn matched_fraction_must_be_in_unit_interval() {
        for fraction in [0.0, -0.5, 1.01, f64::NAN] {
            assert!(matches!(
                bet(MatchedBetKind::Qualifying).with_matched_fraction(fraction),
                Err(CalcError::OutOfRange {
                    field: "matched fraction",
                    ..
                })
            ));
        }
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("snr".parse::<MatchedBetKind>(), Ok(MatchedBetKind::FreeBetSnr));
        assert_eq!("Qualifying".parse::<MatchedBetKind>(), Ok(MatchedBetKind::Qualifying));
        assert!("boost".parse::<MatchedBetKind>().is_err());
    }
}
