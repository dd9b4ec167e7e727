//! Legs: one selection in a multi-selection calculation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CalcError;
use super::odds::Odds;

/// Identifier of a leg, unique within one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegId(String);

impl LegId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LegId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LegId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Exchange or bookmaker commission rate, `0 <= rate < 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Commission(f64);

impl Commission {
    /// No commission.
    pub const ZERO: Self = Self(0.0);

    /// Validate a commission rate such as `0.02`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommission` if `rate` is outside `[0, 1)`.
    pub fn new(rate: f64) -> Result<Self, CalcError> {
        if rate.is_finite() && (0.0..1.0).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(CalcError::InvalidCommission { rate })
        }
    }

    /// Validate a commission given in percent, e.g. `2.0` for 2%.
    pub fn from_percent(percent: f64) -> Result<Self, CalcError> {
        Self::new(percent / 100.0).map_err(|_| CalcError::InvalidCommission { rate: percent / 100.0 })
    }

    pub fn rate(self) -> f64 {
        self.0
    }
}

/// How commission reduces a leg's return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionModel {
    /// Commission is charged on net winnings: `odds - (odds - 1) × c`.
    /// Used for exchange back bets and free-bet/cashback offers.
    #[default]
    Winnings,
    /// Commission is charged on the whole payout: `odds × (1 - c)`.
    Payout,
}

impl CommissionModel {
    /// Commission-adjusted decimal odds.
    pub fn effective_odds(self, odds: Odds, commission: Commission) -> f64 {
        let (o, c) = (odds.value(), commission.rate());
        match self {
            Self::Winnings => o - (o - 1.0) * c,
            Self::Payout => o * (1.0 - c),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Winnings => "winnings",
            Self::Payout => "payout",
        }
    }
}

impl fmt::Display for CommissionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommissionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winnings" => Ok(Self::Winnings),
            "payout" => Ok(Self::Payout),
            other => Err(format!(
                "unknown commission model '{other}' (expected winnings or payout)"
            )),
        }
    }
}

/// One side of a bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    id: LegId,
    back_odds: Odds,
    lay_odds: Option<Odds>,
    commission: Commission,
    custom_stake: Option<f64>,
}

impl Leg {
    /// A back-only leg without commission.
    pub fn new(id: impl Into<LegId>, back_odds: Odds) -> Self {
        Self {
            id: id.into(),
            back_odds,
            lay_odds: None,
            commission: Commission::ZERO,
            custom_stake: None,
        }
    }

    pub fn with_lay_odds(mut self, lay_odds: Odds) -> Self {
        self.lay_odds = Some(lay_odds);
        self
    }

    pub fn with_commission(mut self, commission: Commission) -> Self {
        self.commission = commission;
        self
    }

    /// Attach a stake override.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStakeAmount` if `stake` is not strictly positive.
    pub fn with_custom_stake(mut self, stake: f64) -> Result<Self, CalcError> {
        self.custom_stake = Some(super::error::require_positive("custom stake", stake)?);
        Ok(self)
    }

    pub fn id(&self) -> &LegId {
        &self.id
    }

    pub fn back_odds(&self) -> Odds {
        self.back_odds
    }

    pub fn lay_odds(&self) -> Option<Odds> {
        self.lay_odds
    }

    pub fn commission(&self) -> Commission {
        self.commission
    }

    pub fn custom_stake(&self) -> Option<f64> {
        self.custom_stake
    }

    /// Lay odds, or `MissingLayOdds` for a back-only leg.
    pub fn require_lay_odds(&self) -> Result<Odds, CalcError> {
        self.lay_odds.ok_or_else(|| CalcError::MissingLayOdds {
            leg: self.id.to_string(),
        })
    }

    /// Back odds adjusted for this leg's commission under `model`.
    pub fn effective_odds(&self, model: CommissionModel) -> f64 {
        model.effective_odds(self.back_odds, self.commission)
    }
}

/// Validate a leg set shared by the solver and the arbitrage detector.
///
/// Requires at least two legs and unique ids; the first duplicate in input
/// order is reported.
pub(crate) fn validate_legs(legs: &[Leg]) -> Result<(), CalcError> {
    if legs.len() < 2 {
        return Err(CalcError::InsufficientLegs { valid: legs.len() });
    }
    for (i, leg) in legs.iter().enumerate() {
        if legs[..i].iter().any(|other| other.id == leg.id) {
            return Err(CalcError::UnknownLeg {
                leg: leg.id.to_string(),
            });
        }
    }
    Ok(())
}
