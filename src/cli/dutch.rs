//! Handlers for `layline dutch` and `layline arb`.

use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use crate::cli::legs::build_legs;
use crate::cli::output;
use crate::cli::{ArbArgs, DutchArgs};
use crate::config::Config;
use crate::domain::{
    compute_risk_metrics, detect_arbitrage, evaluate_scenarios, ArbitrageReport, Commission,
    CommissionModel, Leg, NoArbitrage, RiskSummary, Scenario, ScenarioSource, StakeDistribution,
    StakeObjective, StakeOutcome, StakeSolver,
};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct StakeRow {
    #[tabled(rename = "Leg")]
    leg: String,
    #[tabled(rename = "Odds")]
    odds: String,
    #[tabled(rename = "Effective")]
    effective: String,
    #[tabled(rename = "Implied")]
    implied: String,
    #[tabled(rename = "Stake")]
    stake: String,
    #[tabled(rename = "Return")]
    payout: String,
}

#[derive(Tabled)]
pub(crate) struct ScenarioRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

impl From<&Scenario> for ScenarioRow {
    fn from(s: &Scenario) -> Self {
        Self {
            scenario: s.label(),
            profit: output::signed(s.profit),
        }
    }
}

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Leg")]
    leg: String,
    #[tabled(rename = "Odds")]
    odds: String,
    #[tabled(rename = "Effective")]
    effective: String,
    #[tabled(rename = "Implied")]
    implied: String,
}

#[derive(Serialize)]
struct DutchReport<'a> {
    objective: &'a StakeObjective,
    result: &'a StakeOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scenarios: Vec<Scenario>,
    #[serde(skip_serializing_if = "Option::is_none")]
    risk: Option<RiskSummary>,
}

#[derive(Serialize)]
struct ArbReport {
    model: CommissionModel,
    #[serde(flatten)]
    report: ArbitrageReport,
}

fn objective(args: &DutchArgs) -> Result<StakeObjective> {
    if let Some(amount) = args.total_stake {
        return Ok(StakeObjective::total_stake(amount));
    }
    if let Some(amount) = args.target_profit {
        return Ok(StakeObjective::target_profit(amount));
    }
    if let Some((leg, amount)) = &args.custom_stake {
        return Ok(StakeObjective::custom_stake(leg.as_str(), *amount));
    }
    // clap enforces the group; this covers direct callers.
    Err(Error::Parse(
        "one of --total-stake, --target-profit or --custom-stake is required".into(),
    ))
}

/// Execute `dutch`: split a stake across legs and show every outcome.
pub fn execute(args: &DutchArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.defaults.odds_format);
    let model = args.model.unwrap_or(config.defaults.commission_model);
    let legs = build_legs(&args.legs, format, Commission::ZERO)?;
    let objective = objective(args)?;

    let outcome = StakeSolver::new(model).solve(&legs, &objective)?;

    let (scenarios, risk) = match &outcome {
        StakeOutcome::Distribution(distribution) => {
            let scenarios = evaluate_scenarios(ScenarioSource::Dutching {
                distribution,
                legs: &legs,
            })?;
            let risk = compute_risk_metrics(
                &scenarios,
                distribution.total_stake(),
                &config.risk_config(),
            )?;
            info!(
                legs = legs.len(),
                total_stake = distribution.total_stake(),
                profit = distribution.guaranteed_profit(),
                "dutching solved"
            );
            (scenarios, Some(risk))
        }
        StakeOutcome::NoArbitrage(_) => (Vec::new(), None),
    };

    if output::is_json() {
        return output::emit_json(&DutchReport {
            objective: &objective,
            result: &outcome,
            scenarios,
            risk,
        });
    }

    match (&outcome, risk) {
        (StakeOutcome::Distribution(distribution), Some(risk)) => {
            render_distribution(distribution, &scenarios, &risk);
        }
        (StakeOutcome::NoArbitrage(none), _) => render_no_arbitrage(none),
        (StakeOutcome::Distribution(_), None) => {}
    }
    Ok(())
}

fn render_distribution(distribution: &StakeDistribution, scenarios: &[Scenario], risk: &RiskSummary) {
    output::section("Stakes");
    output::table(distribution.legs().iter().map(|s| StakeRow {
        leg: s.leg.to_string(),
        odds: s.back_odds.to_string(),
        effective: format!("{:.3}", s.effective_odds),
        implied: output::percent(s.implied_probability * 100.0),
        stake: output::money(s.stake),
        payout: output::money(s.payout()),
    }));

    output::section("Scenarios");
    output::table(scenarios.iter().map(ScenarioRow::from));

    output::section("Summary");
    output::key_value("Total stake", output::money(distribution.total_stake()));
    output::key_value("Guaranteed profit", output::profit(distribution.guaranteed_profit()));
    output::key_value("ROI", output::percent(distribution.roi_percent()));
    output::key_value(
        "Book",
        output::percent(distribution.total_implied_probability() * 100.0),
    );
    output::key_value("Commission model", distribution.model());
    if risk.is_risk_free {
        output::ok("Risk-free");
    } else {
        output::warn(&format!(
            "Worst case loses {}",
            output::money(risk.qualifying_loss)
        ));
    }
}

fn render_no_arbitrage(none: &NoArbitrage) {
    output::warn(&format!(
        "No arbitrage: book is {} (margin {})",
        output::percent(none.implied_probability_percent),
        output::percent(none.margin_percent),
    ));
}

/// Execute `arb`: report whether the prices guarantee a profit.
pub fn execute_arb(args: &ArbArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.defaults.odds_format);
    let model = args.model.unwrap_or(config.defaults.commission_model);
    let legs = build_legs(&args.legs, format, Commission::ZERO)?;

    let report = detect_arbitrage(&legs, model)?;

    if output::is_json() {
        return output::emit_json(&ArbReport { model, report });
    }

    output::section("Prices");
    output::table(legs.iter().map(|leg| price_row(leg, model)));
    output::section("Result");
    output::key_value("Book", output::percent(report.implied_probability_percent));
    if report.is_arbitrage {
        output::ok(&format!(
            "Arbitrage: {} guaranteed margin",
            output::percent(report.margin_percent)
        ));
    } else {
        output::warn("No arbitrage");
    }
    Ok(())
}

fn price_row(leg: &Leg, model: CommissionModel) -> PriceRow {
    let effective = leg.effective_odds(model);
    PriceRow {
        leg: leg.id().to_string(),
        odds: leg.back_odds().to_string(),
        effective: format!("{effective:.3}"),
        implied: output::percent(100.0 / effective),
    }
}
