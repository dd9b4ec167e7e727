//! Arbitrage detection over a leg set.

use serde::Serialize;
use tracing::debug;

use super::error::CalcError;
use super::leg::{CommissionModel, Leg};
use super::solver::ImpliedBook;

/// Whether a leg set guarantees a profit, and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArbitrageReport {
    pub is_arbitrage: bool,
    /// `(1 / total - 1) × 100` when arbitrage, otherwise 0.
    pub margin_percent: f64,
    /// Sum of commission-adjusted implied probabilities, in percent.
    pub implied_probability_percent: f64,
}

/// Detect arbitrage in `legs` priced under `model`.
///
/// Uses the same leg-set validation and implied-probability book as
/// [`solve_stakes`](super::solve_stakes), so the two never disagree about
/// whether a set is an arbitrage.
///
/// # Errors
///
/// Returns `InsufficientLegs` for fewer than two legs, `UnknownLeg` for
/// duplicate ids.
pub fn detect_arbitrage(legs: &[Leg], model: CommissionModel) -> Result<ArbitrageReport, CalcError> {
    let book = ImpliedBook::build(legs, model)?;
    let is_arbitrage = book.is_arbitrage();

    let report = ArbitrageReport {
        is_arbitrage,
        margin_percent: if is_arbitrage { book.margin_percent() } else { 0.0 },
        implied_probability_percent: book.total * 100.0,
    };

    debug!(
        legs = legs.len(),
        is_arbitrage,
        implied = report.implied_probability_percent,
        "arbitrage check"
    );

    Ok(report)
}
