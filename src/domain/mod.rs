//! Odds, stake and scenario calculation engine.
//!
//! Data flows one way: raw prices are normalised to decimal [`Odds`], the
//! [`StakeSolver`] distributes stakes, [`evaluate_scenarios`] computes the
//! result of every outcome, and [`compute_risk_metrics`] /
//! [`detect_arbitrage`] summarise. Everything here is pure and synchronous.

mod accumulator;
mod arbitrage;
mod each_way;
mod leg;
mod matched;
mod objective;
mod odds;
mod risk;
mod scenario;
mod solver;

pub mod error;
pub mod money;

pub use error::CalcError;

// Odds conversion
pub use odds::{convert_odds, from_decimal, to_decimal, Odds, OddsFormat, OddsInput, OddsValue};

// Legs and objectives
pub use leg::{Commission, CommissionModel, Leg, LegId};
pub use objective::StakeObjective;

// Solvers
pub use accumulator::{combined_odds, AccaRefund, Accumulator};
pub use each_way::{place_odds, EachWay, MarketPrices};
pub use matched::{EarlyPayout, MatchedBet, MatchedBetKind};
pub use solver::{solve_stakes, LegStake, NoArbitrage, StakeDistribution, StakeOutcome, StakeSolver};

// Scenarios and summaries
pub use arbitrage::{detect_arbitrage, ArbitrageReport};
pub use risk::{compute_risk_metrics, kelly_stake, KellyInput, KellyStake, RiskConfig, RiskSummary};
pub use scenario::{evaluate_scenarios, Scenario, ScenarioKind, ScenarioSource};
