//! Summary risk metrics and Kelly stake sizing.

use serde::{Deserialize, Serialize};

use super::error::{require_positive, CalcError};
use super::odds::Odds;
use super::scenario::Scenario;

/// Tunables for [`compute_risk_metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Worst-case losses down to `-risk_free_tolerance` still count as
    /// risk-free. Zero means only a non-negative worst case qualifies.
    #[serde(default)]
    pub risk_free_tolerance: f64,
}

impl RiskConfig {
    /// # Errors
    ///
    /// Returns `OutOfRange` for a negative or non-finite tolerance.
    pub fn new(risk_free_tolerance: f64) -> Result<Self, CalcError> {
        if risk_free_tolerance.is_finite() && risk_free_tolerance >= 0.0 {
            Ok(Self {
                risk_free_tolerance,
            })
        } else {
            Err(CalcError::OutOfRange {
                field: "risk-free tolerance",
                value: risk_free_tolerance,
            })
        }
    }
}

/// Read-only summary over a scenario list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskSummary {
    /// Worst-case result as a percentage of the total stake.
    pub roi_percent: f64,
    pub worst_case: f64,
    pub best_case: f64,
    /// `|min(0, worst_case)|`.
    pub qualifying_loss: f64,
    /// Locked-in margin on the total stake; 0 unless the worst case is
    /// non-negative.
    pub arbitrage_margin_percent: f64,
    pub is_risk_free: bool,
}

/// Summarise `scenarios` against the money committed.
///
/// The guaranteed profit is the worst scenario: every outcome returns at
/// least that much.
///
/// # Errors
///
/// Returns `InsufficientLegs` for an empty scenario list and
/// `InvalidStakeAmount` for a non-positive total stake.
pub fn compute_risk_metrics(
    scenarios: &[Scenario],
    total_stake: f64,
    config: &RiskConfig,
) -> Result<RiskSummary, CalcError> {
    if scenarios.is_empty() {
        return Err(CalcError::InsufficientLegs { valid: 0 });
    }
    let total_stake = require_positive("total stake", total_stake)?;

    let (worst_case, best_case) = scenarios.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), s| (lo.min(s.profit), hi.max(s.profit)),
    );

    let roi_percent = worst_case / total_stake * 100.0;

    Ok(RiskSummary {
        roi_percent,
        worst_case,
        best_case,
        qualifying_loss: worst_case.min(0.0).abs(),
        arbitrage_margin_percent: if worst_case >= 0.0 { roi_percent } else { 0.0 },
        is_risk_free: worst_case >= -config.risk_free_tolerance,
    })
}

/// Inputs to a Kelly criterion sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyInput {
    pub odds: Odds,
    /// The bettor's own estimate of the win probability, in (0, 1). Not
    /// derived from the odds.
    pub probability: f64,
    /// Cap on the staked fraction, in (0, 1].
    pub max_fraction: f64,
    pub bankroll: Option<f64>,
}

/// Kelly-optimal stake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KellyStake {
    /// `max(0, (b×p − q) / b)` before the cap.
    pub full_fraction: f64,
    /// Fraction after applying `max_fraction`.
    pub fraction: f64,
    /// `fraction × bankroll`, when a bankroll was given.
    pub stake: Option<f64>,
    /// `p×b − q` per unit staked.
    pub expected_value_per_unit: f64,
    /// Expected log growth of the bankroll at `fraction`.
    pub growth_rate: f64,
}

/// Size a single back bet with the Kelly criterion.
///
/// # Errors
///
/// Returns `OutOfRange` for a probability outside (0, 1) or a cap outside
/// (0, 1], and `InvalidStakeAmount` for a non-positive bankroll.
pub fn kelly_stake(input: &KellyInput) -> Result<KellyStake, CalcError> {
    let p = input.probability;
    if !(p > 0.0 && p < 1.0) {
        return Err(CalcError::OutOfRange {
            field: "win probability",
            value: p,
        });
    }
    if !(input.max_fraction > 0.0 && input.max_fraction <= 1.0) {
        return Err(CalcError::OutOfRange {
            field: "max Kelly fraction",
            value: input.max_fraction,
        });
    }
    let bankroll = input
        .bankroll
        .map(|b| require_positive("bankroll", b))
        .transpose()?;

    let b = input.odds.value() - 1.0;
    let q = 1.0 - p;
    let full_fraction = ((b * p - q) / b).max(0.0);
    let fraction = full_fraction.min(input.max_fraction);

    let growth_rate = if fraction > 0.0 {
        p * (1.0 + fraction * b).ln() + q * (1.0 - fraction).ln()
    } else {
        0.0
    };

    Ok(KellyStake {
        full_fraction,
        fraction,
        stake: bankroll.map(|bank| bank * fraction),
        expected_value_per_unit: p * b - q,
        growth_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScenarioKind;

    fn scenarios(profits: &[f64]) -> Vec<Scenario> {
        profits
            .iter()
            .map(|p| Scenario::new(ScenarioKind::BackWins, *p))
            .collect()
    }

    fn kelly(odds: f64, p: f64, cap: f64) -> KellyInput {
        KellyInput {
            odds: Odds::new(odds).unwrap(),
            probability: p,
            max_fraction: cap,
            bankroll: None,
        }
    }

    #[test]
    fn summary_of_equal_profits() {
        let summary =
            compute_risk_metrics(&scenarios(&[2.5, 2.5]), 100.0, &RiskConfig::default()).unwrap();
        assert!((summary.roi_percent - 2.5).abs() < 1e-12);
        assert_eq!(summary.qualifying_loss, 0.0);
        assert_eq!(summary.arbitrage_margin_percent, summary.roi_percent);
        assert!(summary.is_risk_free);
    }

    #[test]
    fn qualifying_loss_from_worst_case() {
        let summary =
            compute_risk_metrics(&scenarios(&[-1.5, 3.0]), 50.0, &RiskConfig::default()).unwrap();
        assert_eq!(summary.worst_case, -1.5);
        assert_eq!(summary.best_case, 3.0);
        assert_eq!(summary.qualifying_loss, 1.5);
        assert_eq!(summary.arbitrage_margin_percent, 0.0);
        assert!(!summary.is_risk_free);
    }

    #[test]
    fn tolerance_widens_risk_free_band() {
        let config = RiskConfig::new(2.0).unwrap();
        let summary = compute_risk_metrics(&scenarios(&[-1.5, 3.0]), 50.0, &config).unwrap();
        assert!(summary.is_risk_free);

        let summary = compute_risk_metrics(&scenarios(&[-2.5, 3.0]), 50.0, &config).unwrap();
        assert!(!summary.is_risk_free);
    }

    #[test]
    fn negative_tolerance_rejected() {
        assert!(matches!(
            RiskConfig::new(-0.01),
            Err(CalcError::OutOfRange { .. })
        ));
    }

    #[test]
    fn empty_scenarios_and_zero_stake_rejected() {
        assert!(compute_risk_metrics(&[], 10.0, &RiskConfig::default()).is_err());
        assert!(matches!(
            compute_risk_metrics(&scenarios(&[1.0]), 0.0, &RiskConfig::default()),
            Err(CalcError::InvalidStakeAmount { .. })
        ));
    }

    #[test]
    fn kelly_even_money_with_edge() {
        let k = kelly_stake(&kelly(2.0, 0.55, 1.0)).unwrap();
        assert!((k.full_fraction - 0.10).abs() < 1e-12);
        assert!((k.fraction - 0.10).abs() < 1e-12);
        assert!((k.expected_value_per_unit - 0.10).abs() < 1e-12);
        assert!(k.growth_rate > 0.0);
    }

    #[test]
    fn kelly_negative_edge_stakes_nothing() {
        let k = kelly_stake(&kelly(2.0, 0.45, 1.0)).unwrap();
        assert_eq!(k.full_fraction, 0.0);
        assert_eq!(k.fraction, 0.0);
        assert_eq!(k.growth_rate, 0.0);
        assert!(k.expected_value_per_unit < 0.0);
    }

    #[test]
    fn kelly_is_capped() {
        let mut input = kelly(3.0, 0.6, 0.05);
        input.bankroll = Some(1_000.0);
        let k = kelly_stake(&input).unwrap();
        assert!(k.full_fraction > 0.05);
        assert_eq!(k.fraction, 0.05);
        assert_eq!(k.stake, Some(50.0));
    }

    #[test]
    fn kelly_rejects_bad_inputs() {
        assert!(kelly_stake(&kelly(2.0, 0.0, 0.5)).is_err());
        assert!(kelly_stake(&kelly(2.0, 1.0, 0.5)).is_err());
        assert!(kelly_stake(&kelly(2.0, 0.5, 0.0)).is_err());
        assert!(kelly_stake(&kelly(2.0, 0.5, 1.5)).is_err());

        let mut input = kelly(2.0, 0.55, 0.5);
        input.bankroll = Some(-10.0);
        assert!(matches!(
            kelly_stake(&input),
            Err(CalcError::InvalidStakeAmount { field: "bankroll", .. })
        ));
    }
}
