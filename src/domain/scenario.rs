//! Outcome scenarios and the net result of each.
//!
//! The shape of the scenario list depends on the calculator: one scenario
//! per leg for dutching, two for a back/lay pair, three for accumulators
//! and each-way bets, four fixed ones for early-payout offers. Ordering is
//! part of the contract: leg input order, or the fixed order documented on
//! [`ScenarioKind`].

use std::fmt;

use serde::Serialize;

use super::accumulator::Accumulator;
use super::each_way::EachWay;
use super::error::CalcError;
use super::leg::{Leg, LegId};
use super::matched::{EarlyPayout, MatchedBet};
use super::solver::StakeDistribution;

/// Which outcome a scenario assumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "leg", rename_all = "snake_case")]
pub enum ScenarioKind {
    /// This leg wins and all others lose.
    LegWins(LegId),
    /// Back bet wins, lay bet loses.
    BackWins,
    /// Back bet loses, lay bet wins.
    LayWins,
    /// Early payout triggers and the selection goes on to win.
    PayoutTriggeredWin,
    /// Early payout triggers but the selection fails to win.
    PayoutTriggeredLose,
    /// No early payout; the selection wins.
    NoPayoutWin,
    /// No early payout; the selection fails to win.
    NoPayoutLose,
    /// Every accumulator leg wins.
    AccaWins,
    /// Exactly one leg loses; any refund is paid.
    AccaOneLegLoses,
    /// Two or more legs lose.
    AccaLoses,
    /// Each-way selection wins, so both parts of the back bet pay.
    EachWayWins,
    /// Each-way selection places without winning.
    EachWayPlaces,
    /// Each-way selection finishes outside the places.
    EachWayUnplaced,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegWins(leg) => write!(f, "{leg} wins"),
            Self::BackWins => f.write_str("back wins"),
            Self::LayWins => f.write_str("lay wins"),
            Self::PayoutTriggeredWin => f.write_str("payout triggered, selection wins"),
            Self::PayoutTriggeredLose => f.write_str("payout triggered, selection loses"),
            Self::NoPayoutWin => f.write_str("no payout, selection wins"),
            Self::NoPayoutLose => f.write_str("no payout, selection loses"),
            Self::AccaWins => f.write_str("all legs win"),
            Self::AccaOneLegLoses => f.write_str("one leg loses"),
            Self::AccaLoses => f.write_str("two or more legs lose"),
            Self::EachWayWins => f.write_str("selection wins"),
            Self::EachWayPlaces => f.write_str("selection places"),
            Self::EachWayUnplaced => f.write_str("selection unplaced"),
        }
    }
}

/// One outcome hypothesis and its signed net profit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub profit: f64,
}

impl Scenario {
    pub fn new(kind: ScenarioKind, profit: f64) -> Self {
        Self { kind, profit }
    }

    pub fn label(&self) -> String {
        self.kind.to_string()
    }
}

/// Inputs accepted by [`evaluate_scenarios`].
#[derive(Debug, Clone, Copy)]
pub enum ScenarioSource<'a> {
    /// A solved dutching/arbitrage distribution and the legs it was solved for.
    Dutching {
        distribution: &'a StakeDistribution,
        legs: &'a [Leg],
    },
    /// A back/lay matched bet.
    Matched(&'a MatchedBet),
    /// An early-payout offer.
    EarlyPayout(&'a EarlyPayout),
    /// An accumulator laid at its combined price.
    Accumulator(&'a Accumulator),
    /// An each-way bet with both parts matched.
    EachWay(&'a EachWay),
}

/// Enumerate every scenario for `source` with its net profit.
///
/// # Errors
///
/// Returns `UnknownLeg` when a dutching distribution and its legs disagree.
pub fn evaluate_scenarios(source: ScenarioSource<'_>) -> Result<Vec<Scenario>, CalcError> {
    match source {
        ScenarioSource::Dutching { distribution, legs } => dutching(distribution, legs),
        ScenarioSource::Matched(bet) => Ok(matched(bet)),
        ScenarioSource::EarlyPayout(offer) => Ok(early_payout(offer)),
        ScenarioSource::Accumulator(acca) => Ok(accumulator(acca)),
        ScenarioSource::EachWay(bet) => Ok(each_way(bet)),
    }
}

fn dutching(distribution: &StakeDistribution, legs: &[Leg]) -> Result<Vec<Scenario>, CalcError> {
    if let Some(extra) = distribution
        .legs()
        .iter()
        .find(|s| !legs.iter().any(|leg| leg.id() == &s.leg))
    {
        return Err(CalcError::UnknownLeg {
            leg: extra.leg.to_string(),
        });
    }

    let total = distribution.total_stake();
    legs.iter()
        .map(|leg| {
            let stake = distribution
                .stake_for(leg.id())
                .ok_or_else(|| CalcError::UnknownLeg {
                    leg: leg.id().to_string(),
                })?;
            let odds = leg.effective_odds(distribution.model());
            let profit = stake * (odds - 1.0) - (total - stake);
            Ok(Scenario::new(ScenarioKind::LegWins(leg.id().clone()), profit))
        })
        .collect()
}

fn matched(bet: &MatchedBet) -> Vec<Scenario> {
    vec![
        Scenario::new(ScenarioKind::BackWins, bet.back_wins_profit()),
        Scenario::new(ScenarioKind::LayWins, bet.lay_wins_profit()),
    ]
}

fn early_payout(offer: &EarlyPayout) -> Vec<Scenario> {
    let back_profit = offer.back_profit();
    let lay_profit = offer.lay_profit();
    let liability = offer.bet().liability();
    let stake = offer.bet().back_stake();

    vec![
        Scenario::new(ScenarioKind::PayoutTriggeredWin, back_profit - liability),
        // Payout credits the back winnings even though the lay side also wins.
        Scenario::new(ScenarioKind::PayoutTriggeredLose, back_profit + lay_profit),
        Scenario::new(ScenarioKind::NoPayoutWin, back_profit - liability),
        Scenario::new(ScenarioKind::NoPayoutLose, lay_profit - stake),
    ]
}

fn accumulator(acca: &Accumulator) -> Vec<Scenario> {
    let bet = acca.bet();
    vec![
        Scenario::new(ScenarioKind::AccaWins, bet.back_wins_profit()),
        Scenario::new(
            ScenarioKind::AccaOneLegLoses,
            bet.lay_wins_profit() + acca.refund_value(),
        ),
        Scenario::new(ScenarioKind::AccaLoses, bet.lay_wins_profit()),
    ]
}

fn each_way(bet: &EachWay) -> Vec<Scenario> {
    let (win, place) = (bet.win(), bet.place());
    vec![
        Scenario::new(
            ScenarioKind::EachWayWins,
            win.back_wins_profit() + place.back_wins_profit(),
        ),
        Scenario::new(
            ScenarioKind::EachWayPlaces,
            win.lay_wins_profit() + place.back_wins_profit(),
        ),
        Scenario::new(
            ScenarioKind::EachWayUnplaced,
            win.lay_wins_profit() + place.lay_wins_profit(),
        ),
    ]
}
