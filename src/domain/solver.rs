//! Stake distribution across mutually exclusive legs.
//!
//! Every dutching and arbitrage variant reduces to the same computation:
//! normalise each leg to a commission-adjusted implied probability, then
//! split the total stake in proportion to those probabilities. A
//! guaranteed-profit split exists iff the implied probabilities sum to
//! less than 1.

use serde::Serialize;
use tracing::debug;

use super::error::CalcError;
use super::leg::{validate_legs, CommissionModel, Leg, LegId};
use super::money::{round_currency, Money};
use super::objective::StakeObjective;
use super::odds::Odds;

/// Commission-adjusted pricing of one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PricedLeg {
    pub id: LegId,
    pub back_odds: Odds,
    pub effective_odds: f64,
    pub implied_probability: f64,
}

/// Implied-probability book over a validated leg set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImpliedBook {
    pub legs: Vec<PricedLeg>,
    pub total: f64,
}

impl ImpliedBook {
    /// Price every leg under `model`.
    ///
    /// Shared by the solver and the arbitrage detector so both agree on
    /// which leg sets are usable.
    pub fn build(legs: &[Leg], model: CommissionModel) -> Result<Self, CalcError> {
        validate_legs(legs)?;

        let priced: Vec<PricedLeg> = legs
            .iter()
            .map(|leg| {
                let effective_odds = leg.effective_odds(model);
                PricedLeg {
                    id: leg.id().clone(),
                    back_odds: leg.back_odds(),
                    effective_odds,
                    implied_probability: 1.0 / effective_odds,
                }
            })
            .collect();

        let total: f64 = priced.iter().map(|p| p.implied_probability).sum();
        if !total.is_finite() || total <= f64::MIN_POSITIVE {
            return Err(CalcError::InsufficientLegs { valid: 0 });
        }

        Ok(Self { legs: priced, total })
    }

    pub fn is_arbitrage(&self) -> bool {
        self.total < 1.0
    }

    /// `(1 / total - 1) × 100`, negative when the book is over-round.
    pub fn margin_percent(&self) -> f64 {
        (1.0 / self.total - 1.0) * 100.0
    }

    fn position(&self, id: &LegId) -> Option<usize> {
        self.legs.iter().position(|leg| &leg.id == id)
    }
}

/// The stake placed on one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegStake {
    pub leg: LegId,
    pub stake: f64,
    /// The quoted price, before commission.
    pub back_odds: Odds,
    pub effective_odds: f64,
    pub implied_probability: f64,
}

impl LegStake {
    /// Return if this leg wins: `stake × effective_odds`.
    pub fn payout(&self) -> f64 {
        self.stake * self.effective_odds
    }
}

/// Solver output for a leg set that admits a guaranteed profit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeDistribution {
    legs: Vec<LegStake>,
    total_stake: f64,
    guaranteed_profit: f64,
    total_implied_probability: f64,
    model: CommissionModel,
}

impl StakeDistribution {
    /// Per-leg stakes in input order.
    pub fn legs(&self) -> &[LegStake] {
        &self.legs
    }

    pub fn stake_for(&self, leg: &LegId) -> Option<f64> {
        self.legs.iter().find(|s| &s.leg == leg).map(|s| s.stake)
    }

    pub fn total_stake(&self) -> f64 {
        self.total_stake
    }

    pub fn guaranteed_profit(&self) -> f64 {
        self.guaranteed_profit
    }

    pub fn total_implied_probability(&self) -> f64 {
        self.total_implied_probability
    }

    pub fn model(&self) -> CommissionModel {
        self.model
    }

    /// Guaranteed profit as a percentage of the total stake.
    pub fn roi_percent(&self) -> f64 {
        self.guaranteed_profit / self.total_stake * 100.0
    }

    /// Stakes rounded for display; rounding never feeds back into the math.
    pub fn rounded_stakes(&self) -> Vec<(LegId, Money)> {
        self.legs
            .iter()
            .map(|s| (s.leg.clone(), round_currency(s.stake)))
            .collect()
    }
}

/// A valid negative answer: no split of stakes guarantees a profit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoArbitrage {
    pub total_implied_probability: f64,
    pub implied_probability_percent: f64,
    /// `(1 / total - 1) × 100`; zero or negative.
    pub margin_percent: f64,
}

/// Result of [`solve_stakes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StakeOutcome {
    Distribution(StakeDistribution),
    NoArbitrage(NoArbitrage),
}

impl StakeOutcome {
    pub fn is_arbitrage(&self) -> bool {
        matches!(self, Self::Distribution(_))
    }

    pub fn distribution(&self) -> Option<&StakeDistribution> {
        match self {
            Self::Distribution(d) => Some(d),
            Self::NoArbitrage(_) => None,
        }
    }

    pub fn into_distribution(self) -> Option<StakeDistribution> {
        match self {
            Self::Distribution(d) => Some(d),
            Self::NoArbitrage(_) => None,
        }
    }
}

/// Stake solver bound to a commission model.
#[derive(Debug, Clone, Copy, Default)]
pub struct StakeSolver {
    model: CommissionModel,
}

impl StakeSolver {
    pub fn new(model: CommissionModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> CommissionModel {
        self.model
    }

    /// Distribute stakes across `legs` to satisfy `objective`.
    ///
    /// All inputs are validated before anything is computed. A leg set whose
    /// implied probabilities sum to 1 or more yields
    /// [`StakeOutcome::NoArbitrage`], not an error.
    ///
    /// # Errors
    ///
    /// - `InsufficientLegs` for fewer than two legs
    /// - `UnknownLeg` for duplicate ids or a custom stake on an unknown leg
    /// - `InvalidStakeAmount` for a non-positive objective amount
    pub fn solve(&self, legs: &[Leg], objective: &StakeObjective) -> Result<StakeOutcome, CalcError> {
        let book = ImpliedBook::build(legs, self.model)?;
        let amount = objective.validated_amount()?;
        let custom_index = match objective {
            StakeObjective::CustomStakeOnLeg { leg, .. } => {
                Some(book.position(leg).ok_or_else(|| CalcError::UnknownLeg {
                    leg: leg.to_string(),
                })?)
            }
            _ => None,
        };

        debug!(
            legs = legs.len(),
            objective = objective.name(),
            model = %self.model,
            total_implied = book.total,
            "solving stakes"
        );

        if !book.is_arbitrage() {
            debug!(margin = book.margin_percent(), "no arbitrage in leg set");
            return Ok(StakeOutcome::NoArbitrage(NoArbitrage {
                total_implied_probability: book.total,
                implied_probability_percent: book.total * 100.0,
                margin_percent: book.margin_percent(),
            }));
        }

        let return_factor = 1.0 / book.total - 1.0;
        let total_stake = match custom_index {
            Some(i) => amount / (book.legs[i].implied_probability / book.total),
            None => match objective {
                StakeObjective::TargetProfit { .. } => amount / return_factor,
                _ => amount,
            },
        };
        if !total_stake.is_finite() {
            return Err(CalcError::stake("total stake", total_stake));
        }

        let legs = book
            .legs
            .iter()
            .map(|p| LegStake {
                leg: p.id.clone(),
                stake: p.implied_probability / book.total * total_stake,
                back_odds: p.back_odds,
                effective_odds: p.effective_odds,
                implied_probability: p.implied_probability,
            })
            .collect();

        Ok(StakeOutcome::Distribution(StakeDistribution {
            legs,
            total_stake,
            guaranteed_profit: total_stake * return_factor,
            total_implied_probability: book.total,
            model: self.model,
        }))
    }
}

/// Solve with a one-off [`StakeSolver`].
pub fn solve_stakes(
    legs: &[Leg],
    objective: &StakeObjective,
    model: CommissionModel,
) -> Result<StakeOutcome, CalcError> {
    StakeSolver::new(model).solve(legs, objective)
}
