//! What a stake calculation is solving for.

use serde::Serialize;

use super::error::{require_positive, CalcError};
use super::leg::{Leg, LegId};

/// How the solver distributes money across legs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StakeObjective {
    /// Split a fixed total stake.
    TotalStake { amount: f64 },
    /// Find the total stake that locks in this profit.
    TargetProfit { amount: f64 },
    /// Fix one leg's stake and scale the rest to match.
    CustomStakeOnLeg { leg: LegId, amount: f64 },
}

impl StakeObjective {
    pub fn total_stake(amount: f64) -> Self {
        Self::TotalStake { amount }
    }

    pub fn target_profit(amount: f64) -> Self {
        Self::TargetProfit { amount }
    }

    pub fn custom_stake(leg: impl Into<LegId>, amount: f64) -> Self {
        Self::CustomStakeOnLeg {
            leg: leg.into(),
            amount,
        }
    }

    /// Custom-stake objective from the first leg, in input order, that
    /// carries a stake override.
    pub fn from_leg_override(legs: &[Leg]) -> Option<Self> {
        legs.iter().find_map(|leg| {
            leg.custom_stake()
                .map(|amount| Self::custom_stake(leg.id().clone(), amount))
        })
    }

    /// The objective's amount, checked to be strictly positive.
    pub(crate) fn validated_amount(&self) -> Result<f64, CalcError> {
        match self {
            Self::TotalStake { amount } => require_positive("total stake", *amount),
            Self::TargetProfit { amount } => require_positive("target profit", *amount),
            Self::CustomStakeOnLeg { amount, .. } => require_positive("custom stake", *amount),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TotalStake { .. } => "total_stake",
            Self::TargetProfit { .. } => "target_profit",
            Self::CustomStakeOnLeg { .. } => "custom_stake",
        }
    }
}
