//! Layline - odds, stake and scenario calculations for matched betting.
//!
//! The engine is a pure, synchronous pipeline: raw prices are normalised to
//! decimal odds, stakes are distributed across legs, every outcome scenario
//! is evaluated, and the scenario list is summarised into risk metrics.
//!
//! # Modules
//!
//! - [`domain`] - The calculation engine: odds, legs, solvers, scenarios
//! - [`config`] - TOML configuration for CLI defaults and risk tolerances
//! - [`error`] - Crate-level error types
//! - [`cli`] - The `layline` command-line front end
//!
//! # Example
//!
//! ```
//! use layline::{solve_stakes, to_decimal, CommissionModel, Leg, OddsFormat, StakeObjective};
//!
//! let legs = vec![
//!     Leg::new("home", to_decimal("11/10", OddsFormat::Fractional).unwrap()),
//!     Leg::new("away", to_decimal(2.0, OddsFormat::Decimal).unwrap()),
//! ];
//! let outcome = solve_stakes(&legs, &StakeObjective::total_stake(100.0), CommissionModel::Winnings)
//!     .unwrap();
//! let distribution = outcome.distribution().unwrap();
//! assert!(distribution.guaranteed_profit() > 2.4);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;

pub use domain::{
    compute_risk_metrics, convert_odds, detect_arbitrage, evaluate_scenarios, kelly_stake,
    solve_stakes, to_decimal, AccaRefund, Accumulator, CalcError, Commission, CommissionModel,
    EachWay, EarlyPayout, KellyInput, Leg, MatchedBet, MatchedBetKind, Odds, OddsFormat,
    RiskConfig, Scenario, ScenarioSource, StakeObjective, StakeOutcome,
};
